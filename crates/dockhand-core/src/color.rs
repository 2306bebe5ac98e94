#![forbid(unsafe_code)]

//! Color parsing and the derived pinned-window palette.
//!
//! Users configure two base colors (pinned header accent, taskbar
//! background). Everything else is derived: the header tint is always the
//! accent at 25% alpha, pinned taskbar buttons are the accent darkened 20%
//! and fully opaque. Unparseable accents fall back to the default orange
//! rather than erroring; color is cosmetic.

use serde::{Deserialize, Serialize};

/// Default pinned accent (#ff8800) used when the configured value does not
/// parse.
pub const DEFAULT_PINNED_ACCENT: Rgb = Rgb::new(255, 136, 0);

/// Header tint alpha applied to the pinned accent.
const HEADER_ALPHA: f64 = 0.25;

/// Darkening factor for pinned taskbar buttons.
const BUTTON_FACTOR: f64 = 0.8;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from channel values.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RGB`, `#RGBA`, `#RRGGBB`, or `#RRGGBBAA` hex color.
    ///
    /// Alpha digits are accepted and discarded; the alpha channel is always
    /// derived, never configured.
    #[must_use]
    pub fn parse_hex(value: &str) -> Option<Self> {
        let v = value.trim();
        let hex = v.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let digit = |c: char| c.to_digit(16).map(|d| d as u8);
        match hex.len() {
            3 | 4 => {
                let mut chars = hex.chars();
                let r = digit(chars.next()?)?;
                let g = digit(chars.next()?)?;
                let b = digit(chars.next()?)?;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let channel = |s: &str| u8::from_str_radix(s, 16).ok();
                Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                ))
            }
            _ => None,
        }
    }

    /// Multiply all channels by `factor`, rounding and clamping to 0..=255.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// CSS `rgb(...)` text.
    #[must_use]
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` text with the given alpha.
    #[must_use]
    pub fn css_with_alpha(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

/// Ready-to-apply style values for pinned chrome and the taskbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedPalette {
    /// Pinned window header background, `rgba(...)`.
    pub header_background: String,
    /// Pinned taskbar button background, `rgb(...)`.
    pub button_background: String,
    /// Taskbar strip background, passed through as configured.
    pub taskbar_background: String,
}

impl PinnedPalette {
    /// Derive the palette from the configured accent and taskbar colors.
    #[must_use]
    pub fn derive(pinned_accent: &str, taskbar_color: &str) -> Self {
        let accent = Rgb::parse_hex(pinned_accent).unwrap_or(DEFAULT_PINNED_ACCENT);
        Self {
            header_background: accent.css_with_alpha(HEADER_ALPHA),
            button_background: accent.scaled(BUTTON_FACTOR).css(),
            taskbar_background: taskbar_color.to_owned(),
        }
    }
}
