//! Runtime configuration for the UI utilities.
//!
//! # Design
//! - Every field has a default so a partial (or absent) document is valid.
//! - Class names, event names and storage keys stay configurable; behaviour does not.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Element id of the optional inline JSON configuration script.
pub const CONFIG_ELEMENT_ID: &str = "sneaker-config";
/// Body class toggled while the user navigates with the keyboard.
pub const DEFAULT_KEYBOARD_CLASS: &str = "keyboard-user";
/// Custom DOM event dispatched on `document` when Escape is pressed.
pub const DEFAULT_ESCAPE_EVENT: &str = "escape-pressed";
/// Visually hidden utility class applied to announcement elements.
pub const DEFAULT_ANNOUNCE_CLASS: &str = "sr-only";
/// Delay before an announcement element is removed again.
pub const DEFAULT_ANNOUNCE_CLEAR_MS: u32 = 1_000;
/// Storage key for the active UI section.
pub const DEFAULT_ACTIVE_SECTION_KEY: &str = "sneaker-active-section";
/// Storage key for the user preference bundle.
pub const DEFAULT_USER_PREFERENCES_KEY: &str = "user-preferences";

/// Top-level configuration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Interaction tracking and announcement settings.
    pub accessibility: AccessibilityConfig,
    /// Storage keys used by the session preferences.
    pub session: SessionKeys,
}

impl UiConfig {
    /// Parse a JSON configuration document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or a field has
    /// the wrong shape.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })
    }

    /// Render the configuration as the pretty-printed JSON accepted by [`Self::from_json`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|source| ConfigError::Render { source })
    }
}

/// ARIA live-region politeness for announcements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    /// Announced when the user is idle.
    #[default]
    Polite,
    /// Announced immediately, interrupting current speech.
    Assertive,
}

impl Politeness {
    /// Value for the `aria-live` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// Settings for the interaction tracker and screen-reader announcements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Body class reflecting keyboard navigation mode.
    pub keyboard_class: String,
    /// Name of the custom event dispatched on Escape.
    pub escape_event: String,
    /// Class applied to announcement elements.
    pub announce_class: String,
    /// Milliseconds an announcement stays in the document.
    pub announce_clear_ms: u32,
    /// Live-region politeness for announcements.
    pub politeness: Politeness,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            keyboard_class: DEFAULT_KEYBOARD_CLASS.to_string(),
            escape_event: DEFAULT_ESCAPE_EVENT.to_string(),
            announce_class: DEFAULT_ANNOUNCE_CLASS.to_string(),
            announce_clear_ms: DEFAULT_ANNOUNCE_CLEAR_MS,
            politeness: Politeness::Polite,
        }
    }
}

/// Storage keys for [`SessionPreferences`](crate::core::session::SessionPreferences).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionKeys {
    /// Key holding the active section.
    pub active_section_key: String,
    /// Key holding the user preference bundle.
    pub user_preferences_key: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            active_section_key: DEFAULT_ACTIVE_SECTION_KEY.to_string(),
            user_preferences_key: DEFAULT_USER_PREFERENCES_KEY.to_string(),
        }
    }
}
