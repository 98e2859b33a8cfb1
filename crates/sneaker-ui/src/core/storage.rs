//! Key-value storage seam and safe JSON helpers.
//!
//! # Design
//! - `KeyValueStore` mirrors the browser `Storage` surface (raw strings only).
//! - `read` and `write` absorb every failure: reads fall back, writes are skipped.
//! - `MemoryStore` backs native builds and tests; clones share one map.

use crate::core::error::{StorageError, StorageResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Raw string key-value storage.
pub trait KeyValueStore {
    /// Fetch the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the write.
    fn set_raw(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Where a value returned by [`read_with_origin`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from the stored entry.
    Stored,
    /// No entry (or an empty one); the fallback was used.
    Missing,
    /// The backend failed to read the entry; the fallback was used.
    Unreadable,
    /// The stored entry did not parse as the expected type; the fallback was used.
    Malformed,
}

impl LoadOrigin {
    /// Whether an existing entry or backend had to be ignored.
    #[must_use]
    pub const fn recovered(self) -> bool {
        matches!(self, Self::Unreadable | Self::Malformed)
    }
}

/// Result of a [`write`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The serialized value was stored.
    Stored,
    /// Serialization failed; nothing was stored.
    SkippedSerialize,
    /// The backend rejected the write.
    BackendFailed,
}

/// Read and parse the value stored under `key`.
///
/// Absent, empty, unreadable and malformed entries all yield `fallback`.
pub fn read<T, S>(store: &S, key: &str, fallback: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    read_with_origin(store, key, fallback).0
}

/// Like [`read`], but also reports whether the fallback was used and why.
pub fn read_with_origin<T, S>(store: &S, key: &str, fallback: T) -> (T, LoadOrigin)
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return (fallback, LoadOrigin::Missing),
        Err(err) => {
            tracing::warn!(key, operation = err.operation(), error = %err, "storage read failed");
            return (fallback, LoadOrigin::Unreadable);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => (value, LoadOrigin::Stored),
        Err(err) => {
            tracing::debug!(key, error = %err, "stored value unparsable; using fallback");
            (fallback, LoadOrigin::Malformed)
        }
    }
}

/// Serialize `value` to JSON text.
///
/// # Errors
///
/// Returns [`StorageError::Serialize`] when the value cannot be represented as JSON.
pub fn serialize<T: Serialize + ?Sized>(key: &str, value: &T) -> StorageResult<String> {
    serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })
}

/// Serialize and store `value` under `key`, skipping the write on serialization failure.
pub fn write<T, S>(store: &S, key: &str, value: &T) -> WriteOutcome
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    match serialize(key, value) {
        Ok(serialized) => write_serialized(store, key, &serialized),
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to serialize value for storage; write skipped");
            WriteOutcome::SkippedSerialize
        }
    }
}

pub(crate) fn write_serialized<S>(store: &S, key: &str, serialized: &str) -> WriteOutcome
where
    S: KeyValueStore + ?Sized,
{
    match store.set_raw(key, serialized) {
        Ok(()) => WriteOutcome::Stored,
        Err(err) => {
            tracing::warn!(key, operation = err.operation(), error = %err, "storage write failed");
            WriteOutcome::BackendFailed
        }
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

/// In-memory [`KeyValueStore`]; clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<MemoryInner>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with raw entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.inner.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Number of successful `set_raw` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.get()
    }

    /// Raw value for `key`, bypassing the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set_raw(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.inner.writes.set(self.inner.writes.get() + 1);
        Ok(())
    }
}
