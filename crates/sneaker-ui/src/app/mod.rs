//! Browser bindings, hooks and the demo shell.

use crate::core::session::{PreferredTheme, UserPreferences};
use yew::prelude::*;

pub(crate) mod dom;
pub mod hooks;
pub mod image;
pub mod storage;
pub mod tracker;

pub use hooks::{
    use_image_loader, use_interaction_tracker, use_persisted_state, use_session_preferences,
    use_ui_config,
};

const HERO_IMAGE_SRC: &str = "/assets/hero.jpg";
const SECTIONS: [&str; 3] = ["releases", "drops", "archive"];
const SIZE_FILTER_KEY: &str = "sneaker-size-filter";

/// Demo shell exercising every utility.
#[function_component(SneakerApp)]
pub fn sneaker_app() -> Html {
    let config = use_ui_config();
    let announce = use_interaction_tracker(config.accessibility.clone());
    let session = use_session_preferences(config.session.clone());
    let hero = use_image_loader(HERO_IMAGE_SRC.to_string());
    let size_filter = use_persisted_state(SIZE_FILTER_KEY.to_string(), None::<u8>);

    let sections = SECTIONS.iter().map(|section| {
        let active = session.active_section.as_deref() == Some(*section);
        let onclick = {
            let set_active_section = session.set_active_section.clone();
            let announce = announce.clone();
            let section = (*section).to_string();
            Callback::from(move |_: MouseEvent| {
                announce.emit(format!("{section} selected"));
                set_active_section.emit(Some(section.clone()));
            })
        };
        html! {
            <button class={classes!("tab", active.then_some("tab-active"))} aria-pressed={active.to_string()} {onclick}>
                {*section}
            </button>
        }
    });

    let toggle = |label: &'static str, apply: fn(&mut UserPreferences)| {
        let set_user_preferences = session.set_user_preferences.clone();
        let current = session.user_preferences;
        let onclick = Callback::from(move |_: MouseEvent| {
            let mut next = current;
            apply(&mut next);
            set_user_preferences.emit(next);
        });
        html! { <button class="btn" {onclick}>{label}</button> }
    };

    let on_clear = {
        let clear_session = session.clear_session.clone();
        let announce = announce.clone();
        Callback::from(move |_: MouseEvent| {
            clear_session.emit(());
            announce.emit("Session cleared".to_string());
        })
    };

    let on_size = {
        let size_filter = size_filter.clone();
        Callback::from(move |_: MouseEvent| {
            let next = size_filter.value().map_or(Some(9), |size| size.checked_add(1));
            size_filter.set(next);
        })
    };

    let hero_view = if hero.status.is_loading {
        html! { <div class="skeleton hero" aria-busy="true"></div> }
    } else if hero.status.has_error {
        let retry = hero.retry.clone();
        html! {
            <div class="hero hero-error" role="alert">
                <button class="btn" onclick={Callback::from(move |_: MouseEvent| retry.emit(()))}>
                    {"Retry image"}
                </button>
            </div>
        }
    } else {
        html! { <img class="hero" src={HERO_IMAGE_SRC} alt="" /> }
    };

    html! {
        <main class="sneaker-app">
            {hero_view}
            <nav class="tabs" aria-label="Sections">{for sections}</nav>
            <section class="preferences">
                {toggle("Reduced motion", |prefs| prefs.reduced_motion = !prefs.reduced_motion)}
                {toggle("High contrast", |prefs| prefs.high_contrast = !prefs.high_contrast)}
                {toggle("Cycle theme", |prefs| {
                    prefs.preferred_theme = match prefs.preferred_theme {
                        PreferredTheme::Default => PreferredTheme::Light,
                        PreferredTheme::Light => PreferredTheme::Dark,
                        PreferredTheme::Dark => PreferredTheme::Default,
                    };
                })}
                <button class="btn" onclick={on_size}>
                    {size_filter.value().map_or_else(|| "Any size".to_string(), |size| format!("Size {size}"))}
                </button>
                <button class="btn btn-ghost" onclick={on_clear}>{"Clear session"}</button>
            </section>
        </main>
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<SneakerApp>::with_root(root).render();
    } else {
        yew::Renderer::<SneakerApp>::new().render();
    }
}
