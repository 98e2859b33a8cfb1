//! Browser image fetcher backed by `HtmlImageElement::decode`.

use crate::core::image::{FetchCallback, ImageFetcher, LoadOutcome};
use gloo::console;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlImageElement;

/// Resolves images through a detached `<img>` element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserImageFetcher;

impl ImageFetcher for BrowserImageFetcher {
    fn fetch(&self, src: &str, on_complete: FetchCallback) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                console::error!("image element creation failed", err.clone());
                on_complete(LoadOutcome::Failed {
                    detail: format!("{err:?}"),
                });
                return;
            }
        };
        image.set_src(src);
        let src = src.to_string();
        spawn_local(async move {
            let outcome = match JsFuture::from(image.decode()).await {
                Ok(_) => LoadOutcome::Loaded,
                Err(err) => {
                    console::error!(format!("Failed to load image: {src}"), err.clone());
                    LoadOutcome::Failed {
                        detail: format!("{err:?}"),
                    }
                }
            };
            on_complete(outcome);
        });
    }
}
