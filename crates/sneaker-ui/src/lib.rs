#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Sneaker client-side UI utilities.
//!
//! DOM-free state machines live under [`core`] and are usable (and tested) on any target.
//! The wasm32 build adds browser bindings and Yew hooks on top of them.

pub mod core;

#[cfg(target_arch = "wasm32")]
pub mod app;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

pub use crate::core::config::UiConfig;
pub use crate::core::image::{ImageLoadState, ImageLoadStatus, ImageLoader};
pub use crate::core::interaction::{InteractionMode, InteractionTracker};
pub use crate::core::persisted::{PersistedState, SetOutcome};
pub use crate::core::session::{ClearOutcome, SessionPreferences, UserPreferences};
pub use crate::core::storage::{KeyValueStore, LoadOrigin, MemoryStore};
