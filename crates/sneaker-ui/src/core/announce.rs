//! Screen-reader announcement model.

use crate::core::config::{AccessibilityConfig, Politeness};

/// A transient live-region element: what to render and how long it lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    /// Text announced by assistive technology.
    pub message: String,
    /// Visually hidden utility class.
    pub class: String,
    /// `aria-live` politeness.
    pub politeness: Politeness,
    /// `aria-atomic`; the whole region is read on change.
    pub atomic: bool,
    /// Milliseconds until the element is removed.
    pub clear_after_ms: u32,
}

impl Announcement {
    /// Build an announcement using the configured class, politeness and delay.
    #[must_use]
    pub fn new(message: impl Into<String>, config: &AccessibilityConfig) -> Self {
        Self {
            message: message.into(),
            class: config.announce_class.clone(),
            politeness: config.politeness,
            atomic: true,
            clear_after_ms: config.announce_clear_ms,
        }
    }

    /// Attribute pairs to set on the element, besides class and text.
    #[must_use]
    pub const fn aria_attributes(&self) -> [(&'static str, &'static str); 2] {
        [
            ("aria-live", self.politeness.as_str()),
            ("aria-atomic", if self.atomic { "true" } else { "false" }),
        ]
    }
}
