//! `localStorage` backend for persisted state.

use crate::core::error::{StorageError, StorageResult};
use crate::core::storage::KeyValueStore;
use gloo::console;
use gloo::utils::window;
use wasm_bindgen::JsValue;

/// [`KeyValueStore`] over the browser's `localStorage`.
///
/// Failures are logged to the console here and returned to the core, which falls back
/// or skips the write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        local_storage("get")
            .and_then(|storage| {
                storage
                    .get_item(key)
                    .map_err(|err| backend_error("get", key, &err))
            })
            .inspect_err(|err| log_failure(key, err))
    }

    fn set_raw(&self, key: &str, value: &str) -> StorageResult<()> {
        local_storage("set")
            .and_then(|storage| {
                storage
                    .set_item(key, value)
                    .map_err(|err| backend_error("set", key, &err))
            })
            .inspect_err(|err| log_failure(key, err))
    }
}

fn local_storage(operation: &'static str) -> StorageResult<web_sys::Storage> {
    window()
        .local_storage()
        .ok()
        .flatten()
        .ok_or(StorageError::Unavailable { operation })
}

fn backend_error(operation: &'static str, key: &str, err: &JsValue) -> StorageError {
    StorageError::Backend {
        operation,
        key: key.to_string(),
        detail: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

fn log_failure(key: &str, err: &StorageError) {
    match err {
        StorageError::Backend { detail, .. } => {
            console::error!("storage operation failed", err.operation(), key, detail);
        }
        StorageError::Unavailable { .. } | StorageError::Serialize { .. } => {
            console::error!("storage operation failed", err.operation(), key, err.to_string());
        }
    }
}
