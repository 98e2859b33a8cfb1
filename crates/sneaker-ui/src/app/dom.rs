//! Thin DOM helpers: body markers, custom events, live-region announcements.

use crate::core::announce::Announcement;
use crate::core::config::{CONFIG_ELEMENT_ID, UiConfig};
use crate::core::session::UserPreferences;
use gloo::console;
use gloo::timers::callback::Timeout;
use gloo::utils::window;
use web_sys::{CustomEvent, HtmlElement};

fn body() -> Option<HtmlElement> {
    window().document().and_then(|document| document.body())
}

pub(crate) fn set_body_class(class: &str, enabled: bool) {
    if let Some(body) = body() {
        if let Err(err) = body.class_list().toggle_with_force(class, enabled) {
            console::error!("body class toggle failed", class, err);
        }
    }
}

pub(crate) fn dispatch_document_event(name: &str) {
    let Some(document) = window().document() else {
        return;
    };
    match CustomEvent::new(name) {
        Ok(event) => {
            if let Err(err) = document.dispatch_event(&event) {
                console::error!("custom event dispatch failed", name, err);
            }
        }
        Err(err) => console::error!("custom event construction failed", name, err),
    }
}

/// Append a visually hidden live region and remove it once it has been read.
pub(crate) fn announce(announcement: &Announcement) {
    let Some(document) = window().document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let element = match document.create_element("div") {
        Ok(element) => element,
        Err(err) => {
            console::error!("announcement element creation failed", err);
            return;
        }
    };
    element.set_class_name(&announcement.class);
    element.set_text_content(Some(&announcement.message));
    for (name, value) in announcement.aria_attributes() {
        if let Err(err) = element.set_attribute(name, value) {
            console::error!("announcement attribute failed", name, err);
        }
    }
    if let Err(err) = body.append_child(&element) {
        console::error!("announcement append failed", err);
        return;
    }
    Timeout::new(announcement.clear_after_ms, move || element.remove()).forget();
}

pub(crate) fn apply_user_preferences(preferences: UserPreferences) {
    let Some(body) = body() else {
        return;
    };
    let flag = |value: bool| if value { "true" } else { "false" };
    let attributes = [
        ("data-reduced-motion", flag(preferences.reduced_motion)),
        ("data-high-contrast", flag(preferences.high_contrast)),
        ("data-theme-preference", preferences.preferred_theme.as_str()),
    ];
    for (name, value) in attributes {
        if let Err(err) = body.set_attribute(name, value) {
            console::error!("body attribute update failed", name, err);
        }
    }
}

/// Read the inline JSON config, falling back to defaults when absent or invalid.
pub(crate) fn load_config() -> UiConfig {
    let raw = window()
        .document()
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());
    let Some(raw) = raw else {
        return UiConfig::default();
    };
    match UiConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            console::warn!("invalid ui config; using defaults", err.to_string());
            UiConfig::default()
        }
    }
}
