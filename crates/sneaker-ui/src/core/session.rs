//! Session preferences persisted across reloads.
//!
//! # Design
//! - Two independent entries: the active UI section and the user preference bundle.
//! - Preference JSON keeps camelCase field names so existing stored values keep loading.

use crate::core::config::SessionKeys;
use crate::core::persisted::{PersistedState, SetOutcome};
use crate::core::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Theme the user asked for, independent of the system preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTheme {
    /// Follow the application default.
    #[default]
    Default,
    /// Force the light theme.
    Light,
    /// Force the dark theme.
    Dark,
}

impl PreferredTheme {
    /// String identifier used in body data attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Accessibility and theming preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Suppress non-essential animation.
    pub reduced_motion: bool,
    /// Use the high-contrast palette.
    pub high_contrast: bool,
    /// Preferred theme.
    pub preferred_theme: PreferredTheme,
}

/// Outcomes of the two writes performed by [`SessionPreferences::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Reset of the active section.
    pub active_section: SetOutcome,
    /// Reset of the user preferences.
    pub user_preferences: SetOutcome,
}

impl ClearOutcome {
    /// Whether both entries now hold their defaults in memory.
    ///
    /// A rejected reset (issued while that entry was mid write-back) leaves it unchanged.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.active_section != SetOutcome::Rejected
            && self.user_preferences != SetOutcome::Rejected
    }
}

/// Active section plus user preferences, both persisted.
pub struct SessionPreferences<S> {
    active_section: PersistedState<Option<String>, S>,
    user_preferences: PersistedState<UserPreferences, S>,
}

impl<S> SessionPreferences<S>
where
    S: KeyValueStore + Clone,
{
    /// Open both entries under the default keys.
    pub fn open(store: S) -> Self {
        Self::open_with_keys(store, &SessionKeys::default())
    }

    /// Open both entries under configured keys.
    pub fn open_with_keys(store: S, keys: &SessionKeys) -> Self {
        Self {
            active_section: PersistedState::open(
                store.clone(),
                keys.active_section_key.clone(),
                None,
            ),
            user_preferences: PersistedState::open(
                store,
                keys.user_preferences_key.clone(),
                UserPreferences::default(),
            ),
        }
    }

    /// Currently active section, if any.
    #[must_use]
    pub fn active_section(&self) -> Option<String> {
        self.active_section.get()
    }

    /// Change the active section.
    pub fn set_active_section(&self, section: Option<String>) -> SetOutcome {
        self.active_section.set(section)
    }

    /// Current preferences.
    #[must_use]
    pub fn user_preferences(&self) -> UserPreferences {
        self.user_preferences.get()
    }

    /// Replace the preferences.
    pub fn set_user_preferences(&self, preferences: UserPreferences) -> SetOutcome {
        self.user_preferences.set(preferences)
    }

    /// Underlying active-section entry, for subscriptions.
    #[must_use]
    pub fn active_section_state(&self) -> &PersistedState<Option<String>, S> {
        &self.active_section
    }

    /// Underlying preference entry, for subscriptions.
    #[must_use]
    pub fn user_preferences_state(&self) -> &PersistedState<UserPreferences, S> {
        &self.user_preferences
    }

    /// Reset both entries to their defaults.
    pub fn clear(&self) -> ClearOutcome {
        let outcome = ClearOutcome {
            active_section: self.active_section.set(None),
            user_preferences: self.user_preferences.set(UserPreferences::default()),
        };
        if outcome.is_complete() {
            tracing::debug!("session preferences cleared");
        } else {
            tracing::warn!(
                active_section = ?outcome.active_section,
                user_preferences = ?outcome.user_preferences,
                "session clear was partially rejected"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn defaults_when_storage_is_empty() {
        let session = SessionPreferences::open(MemoryStore::new());
        assert_eq!(session.active_section(), None);
        assert_eq!(session.user_preferences(), UserPreferences::default());
    }

    #[test]
    fn reads_camel_case_values_written_by_existing_clients() {
        let store = MemoryStore::with_entries([
            ("sneaker-active-section", r#""releases""#),
            (
                "user-preferences",
                r#"{"reducedMotion":true,"highContrast":false,"preferredTheme":"dark"}"#,
            ),
        ]);
        let session = SessionPreferences::open(store);
        assert_eq!(session.active_section().as_deref(), Some("releases"));
        assert_eq!(
            session.user_preferences(),
            UserPreferences {
                reduced_motion: true,
                high_contrast: false,
                preferred_theme: PreferredTheme::Dark,
            }
        );
    }

    #[test]
    fn setters_persist_json() {
        let store = MemoryStore::new();
        let session = SessionPreferences::open(store.clone());
        assert_eq!(
            session.set_active_section(Some("drops".to_string())),
            SetOutcome::Written
        );
        session.set_user_preferences(UserPreferences {
            high_contrast: true,
            ..UserPreferences::default()
        });
        assert_eq!(store.raw("sneaker-active-section").as_deref(), Some(r#""drops""#));
        assert_eq!(
            store.raw("user-preferences").as_deref(),
            Some(r#"{"reducedMotion":false,"highContrast":true,"preferredTheme":"default"}"#)
        );
    }

    #[test]
    fn clear_resets_both_entries() {
        let store = MemoryStore::new();
        let session = SessionPreferences::open(store.clone());
        session.set_active_section(Some("archive".to_string()));
        session.set_user_preferences(UserPreferences {
            reduced_motion: true,
            high_contrast: true,
            preferred_theme: PreferredTheme::Light,
        });

        let outcome = session.clear();

        assert_eq!(
            outcome,
            ClearOutcome {
                active_section: SetOutcome::Written,
                user_preferences: SetOutcome::Written,
            }
        );
        assert!(outcome.is_complete());
        assert_eq!(session.active_section(), None);
        assert_eq!(session.user_preferences(), UserPreferences::default());
        assert_eq!(store.raw("sneaker-active-section").as_deref(), Some("null"));
        let reopened = SessionPreferences::open(store);
        assert_eq!(reopened.user_preferences(), UserPreferences::default());
    }

    #[test]
    fn custom_keys_are_honoured() {
        let store = MemoryStore::new();
        let keys = SessionKeys {
            active_section_key: "a".to_string(),
            user_preferences_key: "p".to_string(),
        };
        let session = SessionPreferences::open_with_keys(store.clone(), &keys);
        session.set_active_section(Some("x".to_string()));
        assert_eq!(store.raw("a").as_deref(), Some(r#""x""#));
        assert_eq!(store.raw("sneaker-active-section"), None);
    }

    #[test]
    fn clear_from_a_section_listener_reports_the_rejected_reset() {
        let session = Rc::new(SessionPreferences::open(MemoryStore::new()));
        session.set_user_preferences(UserPreferences {
            high_contrast: true,
            ..UserPreferences::default()
        });
        let nested = Rc::new(RefCell::new(None));
        {
            let weak = Rc::downgrade(&session);
            let nested = Rc::clone(&nested);
            session
                .active_section_state()
                .subscribe(move |_: &Option<String>| {
                    if let Some(session) = weak.upgrade() {
                        *nested.borrow_mut() = Some(session.clear());
                    }
                });
        }

        assert_eq!(
            session.set_active_section(Some("x".to_string())),
            SetOutcome::Written
        );

        let outcome = nested.borrow().expect("listener ran");
        assert_eq!(outcome.active_section, SetOutcome::Rejected);
        assert_eq!(outcome.user_preferences, SetOutcome::Written);
        assert!(!outcome.is_complete());
        assert_eq!(session.active_section().as_deref(), Some("x"));
        assert_eq!(session.user_preferences(), UserPreferences::default());
    }

    #[test]
    fn clearing_defaults_reports_unchanged() {
        let store = MemoryStore::new();
        let session = SessionPreferences::open(store.clone());
        let outcome = session.clear();
        assert_eq!(outcome.active_section, SetOutcome::Unchanged);
        assert_eq!(outcome.user_preferences, SetOutcome::Unchanged);
        assert!(outcome.is_complete());
        assert_eq!(store.write_count(), 0);
    }
}
