//! The fragment router: a fixed table of literal route keys, a two-state
//! machine, and a full-rebuild transition into the mount point.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::RwLock;

use ripple_core::{DomNode, VNode, materialize};

/// A component function registered for a route key.
pub type RouteComponent = Arc<dyn Fn() -> VNode + Send + Sync>;

/// The route table: literal path keys mapped to component functions.
/// Built once at startup; no pattern or parameter matching.
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteComponent>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component for a route key. Chainable, so a table reads
    /// as one declaration.
    pub fn route<F>(mut self, key: impl Into<String>, component: F) -> Self
    where
        F: Fn() -> VNode + Send + Sync + 'static,
    {
        self.routes.insert(key.into(), Arc::new(component));
        self
    }

    pub fn get(&self, key: &str) -> Option<&RouteComponent> {
        self.routes.get(key)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.routes.keys().collect();
        keys.sort();
        f.debug_struct("RouteTable").field("keys", &keys).finish()
    }
}

/// Where the router is in its lifecycle: nothing resolved yet, or resolved
/// to a route key (which may have rendered the not-found placeholder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Resolved(String),
}

/// Resolves fragments against the route table and rebuilds the mount
/// point's subtree on every transition.
pub struct Router {
    table: RouteTable,
    state: RwLock<RouterState>,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            state: RwLock::new(RouterState::Idle),
        }
    }

    pub fn state(&self) -> RouterState {
        self.state.read().clone()
    }

    /// The resolved route key, if any transition has happened yet.
    pub fn current_route(&self) -> Option<String> {
        match &*self.state.read() {
            RouterState::Idle => None,
            RouterState::Resolved(key) => Some(key.clone()),
        }
    }

    /// Handle a load or fragment-change event: resolve the fragment,
    /// produce the new subtree, and replace the mount point's children
    /// with it. Transitions are synchronous and run to completion; the
    /// old subtree is discarded wholesale.
    ///
    /// A component that panics or fails to materialize is replaced by a
    /// visible inline error node; the mount point never keeps a
    /// half-rendered tree.
    pub fn handle_change(&self, fragment: &str, mount: &DomNode) {
        let key = route_key(fragment);
        let tree = match self.table.get(&key) {
            Some(component) => {
                tracing::debug!(route = %key, "resolving route");
                render_boundary(component)
            }
            None => {
                tracing::debug!(route = %key, "no component registered, rendering placeholder");
                not_found_node()
            }
        };

        mount.clear_children();
        mount.append_child(tree);
        *self.state.write() = RouterState::Resolved(key);
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("state", &self.state())
            .finish()
    }
}

/// Normalize a fragment into a route key: strip a leading `#`, default an
/// empty fragment to `"/"`.
fn route_key(fragment: &str) -> String {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if fragment.is_empty() {
        "/".to_string()
    } else {
        fragment.to_string()
    }
}

/// Invoke a route component and materialize its tree, containing panics
/// and render failures to an inline error node.
fn render_boundary(component: &RouteComponent) -> DomNode {
    match catch_unwind(AssertUnwindSafe(|| materialize(&component()))) {
        Ok(Ok(node)) => node,
        Ok(Err(err)) => {
            tracing::error!(error = %err, "route component failed to materialize");
            error_node(&err.to_string())
        }
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            tracing::error!(reason = %reason, "route component panicked");
            error_node(&reason)
        }
    }
}

fn error_node(message: &str) -> DomNode {
    let node = DomNode::element("div");
    node.set_attribute("class", "render-error");
    node.set_attribute("style", "color: red");
    node.append_child(DomNode::text(format!("Rendering error: {message}")));
    node
}

fn not_found_node() -> DomNode {
    let node = DomNode::element("div");
    node.append_child(DomNode::text("404 - Page not found"));
    node
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

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::tags::{div, h1};
    use std::sync::Mutex as StdMutex;

    type CallTracker = Arc<StdMutex<Vec<&'static str>>>;

    fn tracked_table(calls: &CallTracker) -> RouteTable {
        let home_calls = calls.clone();
        let about_calls = calls.clone();
        RouteTable::new()
            .route("/", move || {
                home_calls.lock().unwrap().push("home");
                h1().text("Home").into()
            })
            .route("/about", move || {
                about_calls.lock().unwrap().push("about");
                div().id("about-page").text("About").into()
            })
    }

    #[test]
    fn test_starts_idle() {
        let router = Router::new(RouteTable::new());
        assert_eq!(router.state(), RouterState::Idle);
        assert_eq!(router.current_route(), None);
    }

    #[test]
    fn test_resolves_registered_route() {
        let calls: CallTracker = Arc::default();
        let router = Router::new(tracked_table(&calls));
        let mount = DomNode::element("div");

        router.handle_change("#/about", &mount);

        assert_eq!(router.state(), RouterState::Resolved("/about".to_string()));
        assert_eq!(mount.child_count(), 1);
        assert_eq!(mount.children()[0].attribute("id").as_deref(), Some("about-page"));
        assert_eq!(*calls.lock().unwrap(), ["about"]);
    }

    #[test]
    fn test_empty_fragment_defaults_to_root() {
        let calls: CallTracker = Arc::default();
        let router = Router::new(tracked_table(&calls));
        let mount = DomNode::element("div");

        router.handle_change("", &mount);

        assert_eq!(router.current_route().as_deref(), Some("/"));
        assert_eq!(mount.text_content(), "Home");
    }

    #[test]
    fn test_unknown_route_renders_placeholder_without_invoking_components() {
        let calls: CallTracker = Arc::default();
        let router = Router::new(tracked_table(&calls));
        let mount = DomNode::element("div");

        router.handle_change("#/missing", &mount);

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(mount.text_content(), "404 - Page not found");
        assert_eq!(router.current_route().as_deref(), Some("/missing"));
    }

    #[test]
    fn test_transition_replaces_the_previous_subtree() {
        let calls: CallTracker = Arc::default();
        let router = Router::new(tracked_table(&calls));
        let mount = DomNode::element("div");

        router.handle_change("/", &mount);
        router.handle_change("/about", &mount);

        assert_eq!(mount.child_count(), 1);
        assert_eq!(mount.text_content(), "About");
        assert_eq!(*calls.lock().unwrap(), ["home", "about"]);
    }

    #[test]
    fn test_panicking_component_renders_inline_error() {
        let table = RouteTable::new().route("/boom", || -> VNode {
            panic!("component exploded");
        });
        let router = Router::new(table);
        let mount = DomNode::element("div");

        router.handle_change("/boom", &mount);

        let error = &mount.children()[0];
        assert_eq!(error.attribute("class").as_deref(), Some("render-error"));
        assert!(error.text_content().contains("component exploded"));
        // The router is still usable afterwards.
        router.handle_change("/elsewhere", &mount);
        assert_eq!(mount.text_content(), "404 - Page not found");
    }

    #[test]
    fn test_failed_materialization_renders_inline_error() {
        let table = RouteTable::new().route("/bad", || {
            ripple_core::VElement::new("").text("no tag").into()
        });
        let router = Router::new(table);
        let mount = DomNode::element("div");

        router.handle_change("/bad", &mount);

        let error = &mount.children()[0];
        assert_eq!(error.attribute("class").as_deref(), Some("render-error"));
        assert!(error.text_content().contains("empty tag"));
    }
}
