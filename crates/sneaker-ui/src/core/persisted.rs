//! Reactive value mirrored to a [`KeyValueStore`].
//!
//! # Design
//! - Initialise from storage with a caller-supplied default; never fail.
//! - Compare serialized forms before writing back so equal values cost nothing.
//! - Write-back runs through a single-writer machine (`Idle -> Writing -> Idle`).
//!   Any `set` arriving while `Writing` (for example from a subscriber reacting to the
//!   write) is rejected, which breaks persistence feedback loops.

use crate::core::storage::{self, KeyValueStore, LoadOrigin, WriteOutcome};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Write-back phase of a [`PersistedState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteState {
    /// No write-back in progress; mutations are accepted.
    Idle,
    /// A write-back is in progress; mutations are rejected.
    Writing,
}

/// Result of [`PersistedState::set`] and [`PersistedState::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value changed and was written to storage.
    Written,
    /// The value serialized identically to the previous one; nothing was written.
    Unchanged,
    /// A write-back was already in progress; the call was ignored.
    Rejected,
    /// The value changed in memory but could not be serialized; nothing was written.
    SkippedSerialize,
    /// The value changed in memory but the backend rejected the write.
    BackendFailed,
}

/// Handle returned by [`PersistedState::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

/// Resets the write state to `Idle` when the write-back scope ends.
struct WritingGuard<'a> {
    state: &'a Cell<WriteState>,
}

impl<'a> WritingGuard<'a> {
    fn enter(state: &'a Cell<WriteState>) -> Self {
        state.set(WriteState::Writing);
        Self { state }
    }
}

impl Drop for WritingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(WriteState::Idle);
    }
}

/// A value of type `T` kept in sync with `store` under `key`.
pub struct PersistedState<T, S> {
    key: String,
    store: S,
    origin: LoadOrigin,
    value: RefCell<T>,
    snapshot: RefCell<Option<String>>,
    write_state: Cell<WriteState>,
    listeners: RefCell<Vec<(SubscriberId, Listener<T>)>>,
    next_subscriber: Cell<u64>,
}

impl<T, S> PersistedState<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    /// Load `key` from `store`, falling back to `default` when absent or unreadable.
    pub fn open(store: S, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let (value, origin) = storage::read_with_origin(&store, &key, default);
        let snapshot = storage::serialize(&key, &value).ok();
        Self {
            key,
            store,
            origin,
            value: RefCell::new(value),
            snapshot: RefCell::new(snapshot),
            write_state: Cell::new(WriteState::Idle),
            listeners: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(0),
        }
    }

    /// Storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// How the initial value was obtained when the state was opened.
    #[must_use]
    pub fn load_origin(&self) -> LoadOrigin {
        self.origin
    }

    /// Current write-back phase.
    #[must_use]
    pub fn write_state(&self) -> WriteState {
        self.write_state.get()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value and write it back when it changed.
    pub fn set(&self, value: T) -> SetOutcome {
        if self.write_state.get() == WriteState::Writing {
            tracing::debug!(key = %self.key, "re-entrant set ignored during write-back");
            return SetOutcome::Rejected;
        }
        *self.value.borrow_mut() = value;
        self.sync()
    }

    /// Mutate the value in place and write it back when it changed.
    ///
    /// # Panics
    ///
    /// The value is mutably borrowed while `f` runs, so calling [`Self::with`],
    /// [`Self::get`], `set` or `update` on the same state from inside `f` panics.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> SetOutcome {
        if self.write_state.get() == WriteState::Writing {
            tracing::debug!(key = %self.key, "re-entrant update ignored during write-back");
            return SetOutcome::Rejected;
        }
        f(&mut self.value.borrow_mut());
        self.sync()
    }

    /// Register a listener called with the new value during each write-back.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber.get());
        self.next_subscriber.set(id.0 + 1);
        let listener: Listener<T> = Rc::new(listener);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener; unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.listeners
            .borrow_mut()
            .retain(|(subscriber, _)| *subscriber != id);
    }

    fn sync(&self) -> SetOutcome {
        let serialized = storage::serialize(&self.key, &*self.value.borrow());
        if let Ok(serialized) = &serialized {
            if self.snapshot.borrow().as_deref() == Some(serialized.as_str()) {
                return SetOutcome::Unchanged;
            }
        }

        let _guard = WritingGuard::enter(&self.write_state);
        let outcome = match serialized {
            Ok(serialized) => {
                let outcome = storage::write_serialized(&self.store, &self.key, &serialized);
                *self.snapshot.borrow_mut() = Some(serialized);
                match outcome {
                    WriteOutcome::Stored => SetOutcome::Written,
                    WriteOutcome::BackendFailed => SetOutcome::BackendFailed,
                    WriteOutcome::SkippedSerialize => SetOutcome::SkippedSerialize,
                }
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to serialize value for storage; write skipped");
                *self.snapshot.borrow_mut() = None;
                SetOutcome::SkippedSerialize
            }
        };
        self.notify();
        outcome
    }

    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        let value = self.value.borrow();
        for listener in listeners {
            listener(&value);
        }
    }
}

impl<T, S> PersistedState<T, S>
where
    T: Serialize + DeserializeOwned + Clone,
    S: KeyValueStore,
{
    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for PersistedState<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PersistedState")
            .field("key", &self.key)
            .field("value", &*self.value.borrow())
            .field("write_state", &self.write_state.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Filters {
        brand: String,
        sizes: Vec<u8>,
    }

    fn filters() -> Filters {
        Filters {
            brand: "any".to_string(),
            sizes: vec![9, 10],
        }
    }

    #[test]
    fn open_uses_stored_value_or_default() {
        let store = MemoryStore::with_entries([("count", "5"), ("broken", "{")]);
        assert_eq!(PersistedState::open(store.clone(), "count", 0_u32).get(), 5);
        assert_eq!(PersistedState::open(store.clone(), "broken", 1_u32).get(), 1);
        assert_eq!(PersistedState::open(store, "missing", 2_u32).get(), 2);
    }

    #[test]
    fn open_records_where_the_value_came_from() {
        let store = MemoryStore::with_entries([("count", "5"), ("broken", "{")]);
        assert_eq!(
            PersistedState::open(store.clone(), "count", 0_u32).load_origin(),
            LoadOrigin::Stored
        );
        assert_eq!(
            PersistedState::open(store.clone(), "broken", 0_u32).load_origin(),
            LoadOrigin::Malformed
        );
        assert_eq!(
            PersistedState::open(store, "missing", 0_u32).load_origin(),
            LoadOrigin::Missing
        );
    }

    #[test]
    fn set_writes_changed_values() {
        let store = MemoryStore::new();
        let state = PersistedState::open(store.clone(), "filters", filters());
        let mut next = filters();
        next.sizes.push(11);

        assert_eq!(state.set(next.clone()), SetOutcome::Written);
        assert_eq!(state.get(), next);
        assert_eq!(store.write_count(), 1);
        assert_eq!(
            store.raw("filters").as_deref(),
            Some(r#"{"brand":"any","sizes":[9,10,11]}"#)
        );
        assert_eq!(state.write_state(), WriteState::Idle);
    }

    #[test]
    fn serialized_equal_values_do_not_write() {
        let store = MemoryStore::new();
        let state = PersistedState::open(store.clone(), "filters", filters());
        assert_eq!(state.set(filters()), SetOutcome::Unchanged);
        assert_eq!(state.update(|value| value.brand = "any".to_string()), SetOutcome::Unchanged);
        assert_eq!(store.write_count(), 0);

        assert_eq!(state.update(|value| value.brand = "runner".to_string()), SetOutcome::Written);
        assert_eq!(state.set(state.get()), SetOutcome::Unchanged);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn subscriber_echo_is_rejected_while_writing() {
        let store = MemoryStore::new();
        let state = Rc::new(PersistedState::open(store.clone(), "count", 0_u32));
        let echoes = Rc::new(RefCell::new(Vec::new()));
        {
            let weak = Rc::downgrade(&state);
            let echoes = Rc::clone(&echoes);
            state.subscribe(move |value| {
                if let Some(state) = weak.upgrade() {
                    assert_eq!(state.write_state(), WriteState::Writing);
                    echoes.borrow_mut().push(state.set(value + 1));
                }
            });
        }

        assert_eq!(state.set(1), SetOutcome::Written);
        assert_eq!(*echoes.borrow(), vec![SetOutcome::Rejected]);
        assert_eq!(state.get(), 1);
        assert_eq!(store.write_count(), 1);
        assert_eq!(state.write_state(), WriteState::Idle);
    }

    #[test]
    fn unsubscribed_listeners_are_not_called() {
        let state = PersistedState::open(MemoryStore::new(), "count", 0_u32);
        let calls = Rc::new(Cell::new(0));
        let id = {
            let calls = Rc::clone(&calls);
            state.subscribe(move |_| calls.set(calls.get() + 1))
        };
        state.set(1);
        state.unsubscribe(id);
        state.set(2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn unserializable_values_skip_the_write() {
        // Non-string map keys cannot be represented as JSON object keys.
        let store = MemoryStore::new();
        let state = PersistedState::open(store.clone(), "map", BTreeMap::<(u8, u8), u8>::new());
        let outcome = state.update(|map| {
            map.insert((1, 2), 3);
        });
        assert_eq!(outcome, SetOutcome::SkippedSerialize);
        assert_eq!(state.with(BTreeMap::len), 1);
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.raw("map"), None);
        assert_eq!(state.write_state(), WriteState::Idle);
    }
}
