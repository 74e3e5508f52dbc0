//! Application composition: one handle tying a [`Location`], a [`Router`]
//! and a mount point together.
//!
//! An [`App`] is an explicit instance owned by the caller; there is no
//! process-wide framework object. Handles are cheap clones, so the same
//! app can be captured by event handlers and store subscriptions.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use thiserror::Error;

use ripple_core::DomNode;

use crate::location::Location;
use crate::router::{RouteTable, Router, RouterState};

#[derive(Debug, Error)]
pub enum AppError {
    /// The designated container id was not present under the provided
    /// root. This is the fatal startup condition of the mount contract.
    #[error("mount point with id {0:?} not found")]
    MountPointMissing(String),
}

struct AppInner {
    router: Router,
    location: Location,
    mount: RwLock<Option<DomNode>>,
}

impl AppInner {
    fn handle(&self, fragment: &str) {
        let mount = self.mount.read().clone();
        if let Some(mount) = mount {
            self.router.handle_change(fragment, &mount);
        }
    }
}

/// A mounted-or-mountable application.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    /// Create an app over a fresh [`Location`].
    pub fn new(routes: RouteTable) -> Self {
        Self::with_location(Location::new(), routes)
    }

    /// Create an app over a caller-owned [`Location`], so components built
    /// before the app exists can already hold navigation handles.
    pub fn with_location(location: Location, routes: RouteTable) -> Self {
        Self {
            inner: Arc::new(AppInner {
                router: Router::new(routes),
                location,
                mount: RwLock::new(None),
            }),
        }
    }

    /// Mount the application: locate the container with the given id under
    /// `root`, wire the location-change listener, and run the initial load
    /// transition. The container must exist before the first render.
    pub fn mount(&self, root: &DomNode, container_id: &str) -> Result<(), AppError> {
        let container = root
            .find_by_id(container_id)
            .ok_or_else(|| AppError::MountPointMissing(container_id.to_string()))?;

        if self.inner.mount.read().is_some() {
            tracing::warn!(container = %container_id, "app mounted again; replacing mount point");
        }
        *self.inner.mount.write() = Some(container);

        // The location outlives the app handle that registered with it, so
        // the change listener holds a weak back-reference.
        let weak: Weak<AppInner> = Arc::downgrade(&self.inner);
        self.inner.location.on_change(move |fragment| {
            if let Some(inner) = weak.upgrade() {
                inner.handle(fragment);
            }
        });

        tracing::info!(container = %container_id, "application mounted");

        // Startup load event.
        self.inner.handle(&self.inner.location.fragment());
        Ok(())
    }

    /// Navigate: purely a location-fragment write; the change event
    /// re-enters the router transition.
    pub fn navigate(&self, fragment: &str) {
        self.inner.location.navigate(fragment);
    }

    /// Re-run the current route against the mount point. This is the hook
    /// a store subscription calls to rebuild the view after a state
    /// change.
    pub fn rerender(&self) {
        self.inner.handle(&self.inner.location.fragment());
    }

    /// The location handle, for components that navigate.
    pub fn location(&self) -> Location {
        self.inner.location.clone()
    }

    pub fn router_state(&self) -> RouterState {
        self.inner.router.state()
    }

    pub fn current_route(&self) -> Option<String> {
        self.inner.router.current_route()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.router_state())
            .field("mounted", &self.inner.mount.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::Store;
    use ripple_core::tags::{div, h1, p};
    use serde_json::json;

    fn page_root() -> (DomNode, DomNode) {
        let root = DomNode::element("body");
        let container = DomNode::element("div");
        container.set_attribute("id", "app");
        root.append_child(container.clone());
        (root, container)
    }

    fn two_page_table() -> RouteTable {
        RouteTable::new()
            .route("/", || h1().text("Home").into())
            .route("/about", || p().text("About").into())
    }

    #[test]
    fn test_mount_requires_the_container_id() {
        let app = App::new(two_page_table());
        let root = DomNode::element("body");

        let err = app.mount(&root, "app").unwrap_err();
        assert_eq!(err.to_string(), "mount point with id \"app\" not found");
    }

    #[test]
    fn test_mount_runs_the_initial_load_transition() {
        let app = App::new(two_page_table());
        let (root, container) = page_root();

        app.mount(&root, "app").unwrap();

        assert_eq!(app.current_route().as_deref(), Some("/"));
        assert_eq!(container.text_content(), "Home");
    }

    #[test]
    fn test_navigation_re_enters_the_transition() {
        let app = App::new(two_page_table());
        let (root, container) = page_root();
        app.mount(&root, "app").unwrap();

        app.navigate("#/about");
        assert_eq!(container.text_content(), "About");

        app.navigate("/missing");
        assert_eq!(container.text_content(), "404 - Page not found");
        assert_eq!(app.current_route().as_deref(), Some("/missing"));
    }

    #[test]
    fn test_caller_owned_location_navigates_the_app() {
        let location = Location::new();
        let app = App::with_location(location.clone(), two_page_table());
        let (root, container) = page_root();
        app.mount(&root, "app").unwrap();

        // A navigation handle captured before the app existed still works.
        location.navigate("/about");
        assert_eq!(container.text_content(), "About");
    }

    #[test]
    fn test_store_subscription_drives_rerender() {
        let store = Store::from_json(json!({ "count": 0 })).unwrap();
        let view_store = store.clone();
        let table = RouteTable::new().route("/", move || {
            let count = view_store.get()["count"].clone();
            div().text(format!("count: {count}")).into()
        });

        let app = App::new(table);
        let (root, container) = page_root();
        app.mount(&root, "app").unwrap();
        assert_eq!(container.text_content(), "count: 0");

        let app_in_listener = app.clone();
        store.subscribe(move |_| app_in_listener.rerender());
        store.set(json!({ "count": 3 }).as_object().cloned().unwrap());

        assert_eq!(container.text_content(), "count: 3");
    }

    #[test]
    fn test_rerender_rebuilds_rather_than_reuses() {
        let app = App::new(two_page_table());
        let (root, container) = page_root();
        app.mount(&root, "app").unwrap();

        let first = container.children()[0].clone();
        app.rerender();
        let second = container.children()[0].clone();

        assert_eq!(first.to_html(), second.to_html());
        assert!(!DomNode::ptr_eq(&first, &second));
    }

    #[test]
    fn test_rerender_before_mount_is_a_noop() {
        let app = App::new(two_page_table());
        app.rerender();
        assert_eq!(app.router_state(), RouterState::Idle);
    }

    #[test]
    fn test_handlers_in_routed_views_reach_the_store() {
        let store = Store::from_json(json!({ "count": 0 })).unwrap();
        let view_store = store.clone();
        let table = RouteTable::new().route("/", move || {
            let click_store = view_store.clone();
            ripple_core::tags::button()
                .id("inc")
                .text("+1")
                .on(ripple_core::EventKind::Click, move |_: &ripple_core::Event| {
                    click_store.update(|state| {
                        let count = state["count"].as_i64().unwrap_or(0);
                        json!({ "count": count + 1 }).as_object().cloned().unwrap()
                    });
                })
                .into()
        });

        let app = App::new(table);
        let (root, container) = page_root();
        app.mount(&root, "app").unwrap();

        let app_in_listener = app.clone();
        store.subscribe(move |_| app_in_listener.rerender());

        let button = container.find_by_id("inc").unwrap();
        button.dispatch(&ripple_core::Event::new("click"));

        assert_eq!(store.get()["count"], json!(1));
        // The subtree was rebuilt by the subscription.
        let rebuilt = container.find_by_id("inc").unwrap();
        assert!(!DomNode::ptr_eq(&button, &rebuilt));
    }
}
