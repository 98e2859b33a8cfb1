//! Yew hooks over the core utilities.
//!
//! # Design
//! - Core state machines own the behaviour; hooks only bridge them into component state.
//! - Subscriptions and listeners are released in effect destructors.

use crate::app::dom;
use crate::app::image::BrowserImageFetcher;
use crate::app::storage::BrowserStore;
use crate::app::tracker::InteractionSubscription;
use crate::core::announce::Announcement;
use crate::core::config::{AccessibilityConfig, SessionKeys, UiConfig};
use crate::core::image::{ImageLoadStatus, ImageLoader};
use crate::core::persisted::{PersistedState, SetOutcome};
use crate::core::session::{SessionPreferences, UserPreferences};
use crate::core::storage::LoadOrigin;
use gloo::console;
use gloo::utils::window;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use yew::prelude::*;

/// Configuration read once from the page.
#[hook]
pub fn use_ui_config() -> Rc<UiConfig> {
    use_memo(|_| dom::load_config(), ())
}

/// Track keyboard/pointer mode for the lifetime of the calling component and return
/// the screen-reader announce callback.
#[hook]
pub fn use_interaction_tracker(config: AccessibilityConfig) -> Callback<String> {
    use_effect_with_deps(
        move |config: &AccessibilityConfig| {
            let subscription = window()
                .document()
                .map(|document| InteractionSubscription::register(&document, config));
            move || {
                if let Some(subscription) = subscription {
                    subscription.unregister();
                }
            }
        },
        config.clone(),
    );
    Callback::from(move |message: String| dom::announce(&Announcement::new(message, &config)))
}

/// Loading state for an image source.
#[derive(Clone, Debug, PartialEq)]
pub struct UseImageLoaderHandle {
    /// Current `(is_loading, has_error)` status.
    pub status: ImageLoadStatus,
    /// Re-run the load for the current source.
    pub retry: Callback<()>,
}

/// Load `src` on mount and whenever it changes; stale loads are ignored.
#[hook]
pub fn use_image_loader(src: String) -> UseImageLoaderHandle {
    let status = use_state_eq(|| ImageLoadStatus::LOADING);
    let loader = use_mut_ref(|| None as Option<Rc<ImageLoader<BrowserImageFetcher>>>);
    {
        let status = status.clone();
        let loader = loader.clone();
        use_effect_with_deps(
            move |src: &String| {
                let existing = loader.borrow().clone();
                if let Some(existing) = existing {
                    existing.set_src(src.clone());
                } else {
                    let created = Rc::new(
                        ImageLoader::new(src.clone(), BrowserImageFetcher)
                            .with_observer(move |next| status.set(next)),
                    );
                    *loader.borrow_mut() = Some(Rc::clone(&created));
                    created.load();
                }
                || ()
            },
            src,
        );
    }
    let retry = Callback::from(move |()| {
        let current = loader.borrow().clone();
        if let Some(current) = current {
            current.retry();
        }
    });
    UseImageLoaderHandle {
        status: *status,
        retry,
    }
}

/// Current value and setter of a persisted entry.
#[derive(Clone, Debug, PartialEq)]
pub struct UsePersistedStateHandle<T> {
    value: T,
    setter: Callback<T>,
}

impl<T> UsePersistedStateHandle<T> {
    /// Current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Replace the value; re-entrant and unchanged writes are dropped.
    pub fn set(&self, value: T) {
        self.setter.emit(value);
    }

    /// Setter callback for passing to child components.
    pub fn setter(&self) -> Callback<T> {
        self.setter.clone()
    }
}

/// Mirror a value to `localStorage` under `key`.
#[hook]
pub fn use_persisted_state<T>(key: String, default: T) -> UsePersistedStateHandle<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + 'static,
{
    let persisted = use_memo(
        move |key: &String| {
            let state = PersistedState::open(BrowserStore, key.clone(), default);
            report_load(state.key(), state.load_origin());
            state
        },
        key.clone(),
    );
    let value = use_state_eq(|| persisted.get());
    {
        let value = value.clone();
        let persisted = Rc::clone(&persisted);
        use_effect_with_deps(
            move |_| {
                value.set(persisted.get());
                let id = persisted.subscribe(move |next: &T| value.set(next.clone()));
                move || persisted.unsubscribe(id)
            },
            key,
        );
    }
    let setter = Callback::from(move |next: T| report(persisted.key(), persisted.set(next)));
    UsePersistedStateHandle {
        value: (*value).clone(),
        setter,
    }
}

/// Session preferences bound to component state.
#[derive(Clone, Debug, PartialEq)]
pub struct UseSessionPreferencesHandle {
    /// Active UI section.
    pub active_section: Option<String>,
    /// Accessibility and theme preferences.
    pub user_preferences: UserPreferences,
    /// Change the active section.
    pub set_active_section: Callback<Option<String>>,
    /// Replace the preferences.
    pub set_user_preferences: Callback<UserPreferences>,
    /// Reset both entries to their defaults.
    pub clear_session: Callback<()>,
}

/// Persisted active section and user preferences; preferences are mirrored onto the body.
#[hook]
pub fn use_session_preferences(keys: SessionKeys) -> UseSessionPreferencesHandle {
    let session = use_memo(
        |keys: &SessionKeys| {
            let session = SessionPreferences::open_with_keys(BrowserStore, keys);
            let section = session.active_section_state();
            report_load(section.key(), section.load_origin());
            let preferences = session.user_preferences_state();
            report_load(preferences.key(), preferences.load_origin());
            session
        },
        keys.clone(),
    );
    let active_section = use_state_eq(|| session.active_section());
    let user_preferences = use_state_eq(|| session.user_preferences());
    {
        let session = Rc::clone(&session);
        let active_section = active_section.clone();
        let user_preferences = user_preferences.clone();
        use_effect_with_deps(
            move |_| {
                active_section.set(session.active_section());
                user_preferences.set(session.user_preferences());
                let section_id = session
                    .active_section_state()
                    .subscribe(move |next: &Option<String>| active_section.set(next.clone()));
                let preferences_id = session
                    .user_preferences_state()
                    .subscribe(move |next: &UserPreferences| user_preferences.set(*next));
                move || {
                    session.active_section_state().unsubscribe(section_id);
                    session.user_preferences_state().unsubscribe(preferences_id);
                }
            },
            keys,
        );
    }
    use_effect_with_deps(
        |preferences: &UserPreferences| {
            dom::apply_user_preferences(*preferences);
            || ()
        },
        *user_preferences,
    );

    let set_active_section = {
        let session = Rc::clone(&session);
        Callback::from(move |section: Option<String>| {
            let outcome = session.set_active_section(section);
            report(session.active_section_state().key(), outcome);
        })
    };
    let set_user_preferences = {
        let session = Rc::clone(&session);
        Callback::from(move |preferences: UserPreferences| {
            let outcome = session.set_user_preferences(preferences);
            report(session.user_preferences_state().key(), outcome);
        })
    };
    let clear_session = Callback::from(move |()| {
        let outcome = session.clear();
        report(session.active_section_state().key(), outcome.active_section);
        report(session.user_preferences_state().key(), outcome.user_preferences);
    });

    UseSessionPreferencesHandle {
        active_section: (*active_section).clone(),
        user_preferences: *user_preferences,
        set_active_section,
        set_user_preferences,
        clear_session,
    }
}

fn report_load(key: &str, origin: LoadOrigin) {
    match origin {
        // Unreadable entries are logged by `BrowserStore`.
        LoadOrigin::Stored | LoadOrigin::Missing | LoadOrigin::Unreadable => {}
        LoadOrigin::Malformed => {
            console::warn!(format!(
                "localStorage key \"{key}\" holds invalid JSON; using default"
            ));
        }
    }
}

fn report(key: &str, outcome: SetOutcome) {
    match outcome {
        // Backend failures are logged by `BrowserStore` with the JS detail.
        SetOutcome::Written | SetOutcome::Unchanged | SetOutcome::BackendFailed => {}
        SetOutcome::Rejected => {
            console::warn!(format!(
                "Ignored write to localStorage key \"{key}\" during its own update"
            ));
        }
        SetOutcome::SkippedSerialize => {
            console::warn!(format!(
                "Failed to serialize value for localStorage key \"{key}\""
            ));
        }
    }
}
