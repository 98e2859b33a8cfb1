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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Sneaker UI entry point.
//!
//! The wasm32 build mounts the app. Native builds print the default inline
//! configuration, ready to paste into the page's `#sneaker-config` script element.

#[cfg(target_arch = "wasm32")]
fn main() {
    sneaker_ui::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
use sneaker_ui::{UiConfig, core::config::CONFIG_ELEMENT_ID};

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    write_default_config(&mut stdout)?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn write_default_config(out: &mut impl std::io::Write) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = UiConfig::default().to_json()?;
    writeln!(out, "<script type=\"application/json\" id=\"{CONFIG_ELEMENT_ID}\">")?;
    writeln!(out, "{rendered}")?;
    writeln!(out, "</script>")?;
    Ok(())
}
