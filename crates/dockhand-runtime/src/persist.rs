#![forbid(unsafe_code)]
//! Remembered-pin persistence and the startup restore poll.
//!
//! The remembered list is one JSON array under the host flag store. Old
//! deployments wrote bare document-key strings; current ones write
//! `{ id, position }` objects. Reads accept both and writes preserve
//! whatever was already there, so the two formats coexist in one list.
//!
//! # Invariants
//!
//! 1. The in-memory cache mirrors every valid id in the stored list,
//!    legacy entries included, so `is_remembered` never touches the
//!    store on the hot path.
//! 2. A document appears in the stored list at most once; re-persisting
//!    an already-remembered id is a no-op.
//! 3. Restore polling gives up after the policy's attempt budget; an
//!    abandoned entry stays remembered for the next session.

use ahash::AHashSet;
use dockhand_core::geometry::Bounds;
use dockhand_core::identity::DocumentKey;
use dockhand_core::retry::RetryPolicy;
use dockhand_core::store::{FlagStore, FlagStoreError};
use dockhand_core::window::HostWindowId;
use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Flag-store scope holding all Dockhand state.
pub const PINNED_FLAG_SCOPE: &str = "dockhand";
/// Flag-store key of the remembered-pin list.
pub const PINNED_FLAG_KEY: &str = "pinned-window-ids";

/// Stored ids with this prefix predate document-backed pinning and are
/// kept remembered but never reopened.
const LEGACY_SIDEBAR_PREFIX: &str = "SidebarTab.";

/// One remembered pinned window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedRecord {
    /// Backing document to reopen.
    pub id: DocumentKey,
    /// Placement at the time the pin was persisted.
    #[serde(default)]
    pub position: Option<Bounds>,
}

/// The remembered-pin list plus its id cache.
#[derive(Debug, Default)]
pub struct PinStore {
    cache: AHashSet<DocumentKey>,
}

impl PinStore {
    /// Creates a store with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the stored list, refreshes the cache from every valid id,
    /// and returns the records eligible for reopening.
    pub fn load(&mut self, store: &dyn FlagStore) -> Result<Vec<PinnedRecord>, FlagStoreError> {
        let entries = raw_list(store)?;
        self.cache.clear();
        let mut records = Vec::new();
        for entry in &entries {
            let Some(record) = parse_entry(entry) else {
                tracing::warn!(
                    target: "dockhand_runtime::persist",
                    %entry,
                    "skipping malformed remembered-pin entry"
                );
                continue;
            };
            self.cache.insert(record.id.clone());
            if record.id.as_str().starts_with(LEGACY_SIDEBAR_PREFIX) {
                continue;
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Appends a record unless its id is already stored. Returns whether
    /// the list changed.
    pub fn persist(
        &mut self,
        store: &mut dyn FlagStore,
        record: PinnedRecord,
    ) -> Result<bool, FlagStoreError> {
        let mut list = raw_list(store)?;
        if list.iter().any(|e| entry_id(e) == Some(record.id.as_str())) {
            self.cache.insert(record.id);
            return Ok(false);
        }
        let value = serde_json::to_value(&record).map_err(|e| FlagStoreError::Rejected {
            reason: e.to_string(),
        })?;
        list.push(value);
        store.set_flag(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::Value::Array(list),
        )?;
        self.cache.insert(record.id);
        Ok(true)
    }

    /// Removes every stored entry for an id, legacy or current form.
    pub fn unpersist(
        &mut self,
        store: &mut dyn FlagStore,
        id: &DocumentKey,
    ) -> Result<(), FlagStoreError> {
        let mut list = raw_list(store)?;
        list.retain(|e| entry_id(e) != Some(id.as_str()));
        store.set_flag(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::Value::Array(list),
        )?;
        self.cache.remove(id);
        Ok(())
    }

    /// Drops the whole stored list and the cache.
    pub fn clear(&mut self, store: &mut dyn FlagStore) -> Result<(), FlagStoreError> {
        store.unset_flag(PINNED_FLAG_SCOPE, PINNED_FLAG_KEY)?;
        self.cache.clear();
        Ok(())
    }

    /// Whether an id is in the remembered list, from the cache alone.
    #[must_use]
    pub fn is_remembered(&self, id: &DocumentKey) -> bool {
        self.cache.contains(id)
    }
}

fn raw_list(store: &dyn FlagStore) -> Result<Vec<serde_json::Value>, FlagStoreError> {
    Ok(match store.get_flag(PINNED_FLAG_SCOPE, PINNED_FLAG_KEY)? {
        Some(serde_json::Value::Array(entries)) => entries,
        _ => Vec::new(),
    })
}

fn entry_id(entry: &serde_json::Value) -> Option<&str> {
    match entry {
        serde_json::Value::String(id) => Some(id),
        serde_json::Value::Object(map) => map.get("id")?.as_str(),
        _ => None,
    }
}

fn parse_entry(entry: &serde_json::Value) -> Option<PinnedRecord> {
    match entry {
        serde_json::Value::String(id) => Some(PinnedRecord {
            id: DocumentKey::new(id.as_str()).ok()?,
            position: None,
        }),
        serde_json::Value::Object(map) => {
            let id = DocumentKey::new(map.get("id")?.as_str()?).ok()?;
            let position = map
                .get("position")
                .and_then(|p| serde_json::from_value(p.clone()).ok());
            Some(PinnedRecord { id, position })
        }
        _ => None,
    }
}

/// Outcome of one restore poll for one remembered window.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The reopened window exists; finish pinning and docking it.
    Ready {
        handle: HostWindowId,
        record: PinnedRecord,
    },
    /// The window never appeared within the attempt budget.
    Abandoned { key: DocumentKey },
}

#[derive(Debug)]
struct PendingRestore {
    record: PinnedRecord,
    attempts: u32,
}

/// Remembered windows waiting for their reopened editor to appear.
///
/// Opening a document is asynchronous on the host side, so after issuing
/// the open the controller polls here at the policy's interval until the
/// window shows up or the attempt budget runs out.
#[derive(Debug)]
pub struct RestoreQueue {
    policy: RetryPolicy,
    pending: Vec<PendingRestore>,
    next_poll: Option<Instant>,
}

impl RestoreQueue {
    /// Creates an empty queue with the given retry policy.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
            next_poll: None,
        }
    }

    /// Starts waiting for a record's window.
    pub fn enqueue(&mut self, record: PinnedRecord, now: Instant) {
        self.pending.push(PendingRestore {
            record,
            attempts: 0,
        });
        if self.next_poll.is_none() {
            self.next_poll = Some(now + self.policy.delay());
        }
    }

    /// Checks every pending record once, if the poll interval has
    /// elapsed. `lookup` maps a document to its open window, if any.
    pub fn poll(
        &mut self,
        now: Instant,
        lookup: impl Fn(&DocumentKey) -> Option<HostWindowId>,
    ) -> Vec<RestoreOutcome> {
        let Some(due) = self.next_poll else {
            return Vec::new();
        };
        if now < due {
            return Vec::new();
        }
        let policy = self.policy;
        let mut outcomes = Vec::new();
        self.pending.retain_mut(|pending| {
            if let Some(handle) = lookup(&pending.record.id) {
                outcomes.push(RestoreOutcome::Ready {
                    handle,
                    record: pending.record.clone(),
                });
                return false;
            }
            pending.attempts += 1;
            if policy.allows(pending.attempts) {
                true
            } else {
                outcomes.push(RestoreOutcome::Abandoned {
                    key: pending.record.id.clone(),
                });
                false
            }
        });
        self.next_poll = (!self.pending.is_empty()).then(|| now + policy.delay());
        outcomes
    }

    /// Instant of the next poll, if anything is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_poll
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand_core::testing::MemoryFlagStore;
    use std::time::Duration;

    fn doc(raw: &str) -> DocumentKey {
        DocumentKey::new(raw).unwrap()
    }

    #[test]
    fn load_accepts_both_entry_formats() {
        let mut flags = MemoryFlagStore::new();
        flags.seed(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::json!([
                "Actor.legacy",
                { "id": "Item.sword", "position": { "left": 10.0, "top": 20.0, "width": 600.0, "height": 400.0 } },
                { "id": "Actor.nopos", "position": null },
            ]),
        );
        let mut pins = PinStore::new();
        let records = pins.load(&flags).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, doc("Actor.legacy"));
        assert!(records[0].position.is_none());
        assert_eq!(
            records[1].position,
            Some(Bounds::new(10.0, 20.0, 600.0, 400.0))
        );
        assert!(records[2].position.is_none());
        assert!(pins.is_remembered(&doc("Item.sword")));
    }

    #[test]
    fn load_skips_malformed_and_sidebar_entries() {
        let mut flags = MemoryFlagStore::new();
        flags.seed(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::json!([
                42,
                "",
                { "position": null },
                "SidebarTab.actors",
                "Actor.real",
            ]),
        );
        let mut pins = PinStore::new();
        let records = pins.load(&flags).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, doc("Actor.real"));
        // Sidebar ids stay remembered even though they are not reopened.
        assert!(pins.is_remembered(&doc("SidebarTab.actors")));
        assert!(!pins.is_remembered(&doc("Actor.bogus")));
    }

    #[test]
    fn load_tolerates_a_non_array_flag() {
        let mut flags = MemoryFlagStore::new();
        flags.seed(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::json!({ "not": "a list" }),
        );
        let mut pins = PinStore::new();
        assert!(pins.load(&flags).unwrap().is_empty());
    }

    #[test]
    fn persist_appends_once_and_preserves_legacy_entries() {
        let mut flags = MemoryFlagStore::new();
        flags.seed(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::json!(["Actor.legacy"]),
        );
        let mut pins = PinStore::new();
        let record = PinnedRecord {
            id: doc("Item.sword"),
            position: Some(Bounds::new(10.0, 20.0, 600.0, 400.0)),
        };
        assert!(pins.persist(&mut flags, record.clone()).unwrap());
        assert!(!pins.persist(&mut flags, record).unwrap());
        // Persisting an id that only exists in legacy form changes nothing.
        assert!(
            !pins
                .persist(
                    &mut flags,
                    PinnedRecord {
                        id: doc("Actor.legacy"),
                        position: None,
                    },
                )
                .unwrap()
        );

        let stored = flags.peek(PINNED_FLAG_SCOPE, PINNED_FLAG_KEY).unwrap();
        let list = stored.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], serde_json::json!("Actor.legacy"));
        assert_eq!(list[1]["id"], "Item.sword");
        assert!(pins.is_remembered(&doc("Actor.legacy")));
    }

    #[test]
    fn unpersist_removes_both_forms() {
        let mut flags = MemoryFlagStore::new();
        flags.seed(
            PINNED_FLAG_SCOPE,
            PINNED_FLAG_KEY,
            serde_json::json!([
                "Actor.a",
                { "id": "Actor.a", "position": null },
                "Item.keep",
            ]),
        );
        let mut pins = PinStore::new();
        pins.load(&flags).unwrap();
        pins.unpersist(&mut flags, &doc("Actor.a")).unwrap();
        let stored = flags.peek(PINNED_FLAG_SCOPE, PINNED_FLAG_KEY).unwrap();
        assert_eq!(stored, &serde_json::json!(["Item.keep"]));
        assert!(!pins.is_remembered(&doc("Actor.a")));
        assert!(pins.is_remembered(&doc("Item.keep")));
    }

    #[test]
    fn clear_unsets_the_flag() {
        let mut flags = MemoryFlagStore::new();
        let mut pins = PinStore::new();
        pins.persist(
            &mut flags,
            PinnedRecord {
                id: doc("Actor.a"),
                position: None,
            },
        )
        .unwrap();
        pins.clear(&mut flags).unwrap();
        assert!(flags.peek(PINNED_FLAG_SCOPE, PINNED_FLAG_KEY).is_none());
        assert!(!pins.is_remembered(&doc("Actor.a")));
    }

    #[test]
    fn unavailable_store_propagates() {
        let mut flags = MemoryFlagStore::new();
        flags.unavailable = true;
        let mut pins = PinStore::new();
        assert_eq!(pins.load(&flags), Err(FlagStoreError::Unavailable));
        assert_eq!(
            pins.persist(
                &mut flags,
                PinnedRecord {
                    id: doc("Actor.a"),
                    position: None,
                },
            ),
            Err(FlagStoreError::Unavailable)
        );
    }

    #[test]
    fn queue_reports_ready_when_the_window_appears() {
        let policy = RetryPolicy::new(10, Duration::from_millis(250));
        let mut queue = RestoreQueue::new(policy);
        let start = Instant::now();
        queue.enqueue(
            PinnedRecord {
                id: doc("Actor.a"),
                position: None,
            },
            start,
        );
        assert_eq!(queue.next_deadline(), Some(start + policy.delay()));

        // Not due yet.
        assert!(queue.poll(start, |_| None).is_empty());

        let handle = HostWindowId::new(7).unwrap();
        let outcomes = queue.poll(start + policy.delay(), |_| Some(handle));
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            &outcomes[0],
            RestoreOutcome::Ready { handle: h, record } if *h == handle && record.id == doc("Actor.a")
        ));
        assert!(queue.is_empty());
        assert!(queue.next_deadline().is_none());
    }

    #[test]
    fn queue_abandons_after_the_attempt_budget() {
        let policy = RetryPolicy::new(3, Duration::from_millis(250));
        let mut queue = RestoreQueue::new(policy);
        let start = Instant::now();
        queue.enqueue(
            PinnedRecord {
                id: doc("Actor.slow"),
                position: None,
            },
            start,
        );

        let mut now = start;
        for _ in 0..2 {
            now += policy.delay();
            assert!(queue.poll(now, |_| None).is_empty());
        }
        now += policy.delay();
        let outcomes = queue.poll(now, |_| None);
        assert_eq!(
            outcomes,
            vec![RestoreOutcome::Abandoned {
                key: doc("Actor.slow"),
            }]
        );
        assert!(queue.is_empty());
        assert!(queue.next_deadline().is_none());
    }

    #[test]
    fn queue_polls_all_pending_records_together() {
        let policy = RetryPolicy::new(10, Duration::from_millis(250));
        let mut queue = RestoreQueue::new(policy);
        let start = Instant::now();
        for raw in ["Actor.a", "Actor.b"] {
            queue.enqueue(
                PinnedRecord {
                    id: doc(raw),
                    position: None,
                },
                start,
            );
        }
        let handle = HostWindowId::new(3).unwrap();
        let outcomes = queue.poll(start + policy.delay(), |id| {
            (id.as_str() == "Actor.b").then_some(handle)
        });
        assert_eq!(outcomes.len(), 1);
        assert!(!queue.is_empty());
        assert_eq!(
            queue.next_deadline(),
            Some(start + policy.delay() + policy.delay())
        );
    }
}
