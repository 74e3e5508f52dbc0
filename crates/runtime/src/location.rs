//! The location-fragment protocol: a register holding the current fragment
//! and the listeners that react when it changes.
//!
//! This plays the role the address bar plays for the source system:
//! navigation is purely a fragment write, and the resulting change event is
//! what drives the router.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

type ChangeListener = Arc<dyn Fn(&str) + Send + Sync>;

struct LocationInner {
    fragment: RwLock<String>,
    listeners: Mutex<Vec<ChangeListener>>,
}

/// A shared handle to the current location fragment.
#[derive(Clone)]
pub struct Location {
    inner: Arc<LocationInner>,
}

impl Location {
    /// Create a location with an empty fragment (which routes as `"/"`).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LocationInner {
                fragment: RwLock::new(String::new()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The current fragment, without any leading `#`.
    pub fn fragment(&self) -> String {
        self.inner.fragment.read().clone()
    }

    /// Write a new fragment and fire the change event. A leading `#` is
    /// tolerated and stripped, so `navigate("#/about")` and
    /// `navigate("/about")` are the same write.
    pub fn navigate(&self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        *self.inner.fragment.write() = fragment.to_string();
        tracing::debug!(fragment, "location fragment changed");

        let listeners: Vec<ChangeListener> = self.inner.listeners.lock().clone();
        for listener in listeners {
            listener(fragment);
        }
    }

    /// Register a change listener. Listeners fire on every subsequent
    /// [`Location::navigate`], in registration order.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.inner.listeners.lock().push(Arc::new(listener));
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Location")
            .field("fragment", &*self.inner.fragment.read())
            .finish()
    }
}
