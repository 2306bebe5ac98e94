#![forbid(unsafe_code)]

//! Bounded fixed-interval retry policy.
//!
//! Replaces ad-hoc polling loops (notably the startup pin-restore poll) with
//! one explicit, testable primitive. Delays use a fixed interval with no
//! jitter so replay-based tests reproduce exact timing.
//!
//! # Example
//!
//! ```
//! use dockhand_core::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(10, Duration::from_millis(250));
//! assert!(policy.allows(9));
//! assert!(!policy.allows(10));
//! assert_eq!(policy.total_budget(), Duration::from_millis(2500));
//! ```

use std::time::Duration;

/// A bounded retry policy with a fixed interval between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (0 = never try).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Create a new policy.
    #[must_use]
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Whether another attempt is allowed after `attempts_made` attempts.
    #[inline]
    #[must_use]
    pub const fn allows(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }

    /// The delay before the next attempt. Constant for every attempt.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.interval
    }

    /// Total waiting time across all attempts (for timeout budgeting).
    #[must_use]
    pub fn total_budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}
