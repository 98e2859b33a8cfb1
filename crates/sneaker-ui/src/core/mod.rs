//! Core, DOM-free primitives for the UI utilities.
pub mod announce;
pub mod config;
pub mod error;
pub mod image;
pub mod interaction;
pub mod persisted;
pub mod session;
pub mod storage;
