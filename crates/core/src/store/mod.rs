//! A tiny pub/sub state store.
//!
//! The store owns a JSON object as state. Updates are shallow merges of a
//! patch over the current state; listeners are notified only when the
//! merged state actually differs, judged by its serialized form.
//!
//! Handles are cheap clones sharing the same container, so a store created
//! at startup can be captured by as many event handlers as needed.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use thiserror::Error;


/// The state held by a [`Store`]: a JSON object mapping top-level keys to
/// arbitrary values.
pub type State = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Store state must be a JSON object so patches have keys to merge on.
    #[error("store state must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

type Listener = Arc<dyn Fn(&State) + Send + Sync>;

struct ListenerEntry {
    id: u64,
    listener: Listener,
}

struct StoreInner {
    state: RwLock<State>,
    listeners: Mutex<Vec<ListenerEntry>>,
    next_listener_id: Mutex<u64>,
    version: Mutex<u64>,
}

/// A mutable state container with shallow-merge updates, change detection
/// and listener notification.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store with the given initial state.
    pub fn new(initial: State) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: Mutex::new(0),
                version: Mutex::new(0),
            }),
        }
    }

    /// Create a store from any JSON value, rejecting non-object roots.
    pub fn from_json(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            other => Err(StoreError::NotAnObject(json_type_name(&other))),
        }
    }

    /// A snapshot of the current state. The returned copy is the caller's
    /// own; mutating it never affects the store.
    pub fn get(&self) -> State {
        self.inner.state.read().clone()
    }

    /// Shallow-merge a patch over the current state: every top-level key in
    /// the patch replaces the corresponding key wholesale. Nested objects
    /// are not deep-merged, so a patch must carry complete nested values.
    pub fn set(&self, patch: State) {
        self.apply(patch);
    }

    /// Compute a patch from the pre-update state, then shallow-merge it.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&State) -> State,
    {
        let patch = {
            let state = self.inner.state.read();
            updater(&state)
        };
        self.apply(patch);
    }

    /// Register a listener for state changes. Listeners run in
    /// subscription order and receive the post-update state.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        let id = {
            let mut next = self.inner.next_listener_id.lock();
            *next += 1;
            *next
        };
        self.inner.listeners.lock().push(ListenerEntry {
            id,
            listener: Arc::new(listener),
        });
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Monotonic count of state changes that produced a notification.
    pub fn version(&self) -> u64 {
        *self.inner.version.lock()
    }

    fn apply(&self, patch: State) {
        let (old_serialized, new_state) = {
            let mut state = self.inner.state.write();
            let old_serialized = serialized(&state);
            for (key, value) in patch {
                state.insert(key, value);
            }
            (old_serialized, state.clone())
        };

        // Coarse change detection: compare serialized forms. The map type
        // serializes keys in sorted order, so structurally equal states
        // always compare equal here.
        if serialized(&new_state) == old_serialized {
            tracing::debug!("state unchanged after merge, skipping notification");
            return;
        }

        *self.inner.version.lock() += 1;
        self.notify(&new_state);
    }

    fn notify(&self, state: &State) {
        // Snapshot the registry so listeners can subscribe/unsubscribe
        // freely while the pass runs, then re-check registration before
        // each delivery: a listener removed mid-pass is never invoked.
        let entries: Vec<(u64, Listener)> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|entry| (entry.id, entry.listener.clone()))
            .collect();

        for (id, listener) in entries {
            let still_registered = self
                .inner
                .listeners
                .lock()
                .iter()
                .any(|entry| entry.id == id);
            if !still_registered {
                continue;
            }
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(state))) {
                tracing::error!(
                    target: "ripple::store",
                    listener = id,
                    reason = %panic_reason(payload.as_ref()),
                    "state listener panicked; continuing with remaining listeners"
                );
            }
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.inner.state.read().len())
            .field("listeners", &self.listener_count())
            .field("version", &self.version())
            .finish()
    }
}

/// The capability returned by [`Store::subscribe`]: removes exactly the
/// listener it was created for.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Remove the listener. Calling this more than once, or after the
    /// store is gone, is a no-op.
    pub fn unsubscribe(&self) {
        let Some(inner) = self.store.upgrade() else {
            return;
        };
        let mut listeners = inner.listeners.lock();
        if let Some(position) = listeners.iter().position(|entry| entry.id == self.id) {
            listeners.remove(position);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn serialized(state: &State) -> String {
    serde_json::to_string(state).unwrap_or_else(|err| {
        tracing::error!(error = %err, "state failed to serialize for change detection");
        String::new()
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<unknown panic>".to_string()
    }
}
