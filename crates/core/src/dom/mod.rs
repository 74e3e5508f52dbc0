//! The concrete UI-node tree that virtual nodes are materialized into.
//!
//! Nodes are shared handles: cloning a [`DomNode`] clones the handle, not the
//! node, so a node appended to a parent and a handle held by a test observe
//! the same attributes, listeners and children. Identity is the shared
//! allocation and can be checked with [`DomNode::ptr_eq`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;


/// Payload delivered to event listeners when an event is dispatched.
///
/// `value` carries an input's current text and `key` a keyboard key name,
/// for the listeners that want them; both are optional.
#[derive(Debug, Clone, Default)]
pub struct Event {
    name: String,
    value: Option<String>,
    key: Option<String>,
}

impl Event {
    /// Create an event with the given name (`"click"`, `"input"`, ...).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            key: None,
        }
    }

    /// Attach an input value to the event.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a keyboard key name to the event.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// A cheaply clonable event listener.
///
/// Handlers are shared `Fn` closures so the same handler can be bound to
/// several nodes (or the same node twice, which is allowed and means it
/// fires twice).
pub struct EventHandler {
    handler: Arc<dyn Fn(&Event) + Send + Sync>,
}

impl EventHandler {
    /// Create a new handler from a closure.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(func),
        }
    }

    /// Invoke the handler with the given event.
    pub fn emit(&self, event: &Event) {
        (self.handler)(event);
    }
}

impl Clone for EventHandler {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

impl<F> From<F> for EventHandler
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

struct ElementInner {
    tag: String,
    attributes: RwLock<BTreeMap<String, String>>,
    listeners: RwLock<Vec<(String, EventHandler)>>,
    children: RwLock<Vec<DomNode>>,
}

enum NodeInner {
    Text(RwLock<String>),
    Element(ElementInner),
}

/// A concrete UI-tree node: either a text leaf or an element with a tag,
/// attributes, event listeners and ordered children.
#[derive(Clone)]
pub struct DomNode {
    inner: Arc<NodeInner>,
}

impl DomNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(NodeInner::Text(RwLock::new(content.into()))),
        }
    }

    /// Create an element node with the given tag and no attributes,
    /// listeners or children.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(NodeInner::Element(ElementInner {
                tag: tag.into(),
                attributes: RwLock::new(BTreeMap::new()),
                listeners: RwLock::new(Vec::new()),
                children: RwLock::new(Vec::new()),
            })),
        }
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(a: &DomNode, b: &DomNode) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn is_text(&self) -> bool {
        matches!(&*self.inner, NodeInner::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(&*self.inner, NodeInner::Element(_))
    }

    /// The element tag, or `None` for text nodes.
    pub fn tag(&self) -> Option<&str> {
        match &*self.inner {
            NodeInner::Element(element) => Some(element.tag.as_str()),
            NodeInner::Text(_) => None,
        }
    }

    /// Set an attribute, replacing any previous value. Ignored (with a
    /// warning) on text nodes.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match &*self.inner {
            NodeInner::Element(element) => {
                element.attributes.write().insert(name, value.into());
            }
            NodeInner::Text(_) => {
                tracing::warn!(attribute = %name, "cannot set an attribute on a text node");
            }
        }
    }

    /// Read an attribute value.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &*self.inner {
            NodeInner::Element(element) => element.attributes.read().get(name).cloned(),
            NodeInner::Text(_) => None,
        }
    }

    /// Snapshot of all attributes, sorted by name.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        match &*self.inner {
            NodeInner::Element(element) => element.attributes.read().clone(),
            NodeInner::Text(_) => BTreeMap::new(),
        }
    }

    /// Register a listener for the named event. Listeners fire in
    /// registration order; registering the same handler twice means it
    /// fires twice.
    pub fn add_event_listener(&self, event: impl Into<String>, handler: EventHandler) {
        let event = event.into();
        match &*self.inner {
            NodeInner::Element(element) => {
                element.listeners.write().push((event, handler));
            }
            NodeInner::Text(_) => {
                tracing::warn!(event = %event, "cannot add a listener to a text node");
            }
        }
    }

    /// Number of listeners registered for the named event.
    pub fn listener_count(&self, event: &str) -> usize {
        match &*self.inner {
            NodeInner::Element(element) => element
                .listeners
                .read()
                .iter()
                .filter(|(name, _)| name == event)
                .count(),
            NodeInner::Text(_) => 0,
        }
    }

    /// Dispatch an event against this node, invoking every listener
    /// registered for its name in registration order. Returns how many
    /// listeners ran.
    ///
    /// Listeners are cloned out before the first invocation so a handler
    /// may mutate this node (or re-render into it) without deadlocking.
    pub fn dispatch(&self, event: &Event) -> usize {
        let matching: Vec<EventHandler> = match &*self.inner {
            NodeInner::Element(element) => element
                .listeners
                .read()
                .iter()
                .filter(|(name, _)| name == event.name())
                .map(|(_, handler)| handler.clone())
                .collect(),
            NodeInner::Text(_) => Vec::new(),
        };
        for handler in &matching {
            handler.emit(event);
        }
        matching.len()
    }

    /// Append a child node. Appending is ordered; children render in the
    /// order they were appended.
    pub fn append_child(&self, child: DomNode) {
        match &*self.inner {
            NodeInner::Element(element) => element.children.write().push(child),
            NodeInner::Text(_) => {
                tracing::warn!("cannot append a child to a text node");
            }
        }
    }

    /// Drop all children. The old subtree is discarded, not reused.
    pub fn clear_children(&self) {
        if let NodeInner::Element(element) = &*self.inner {
            element.children.write().clear();
        }
    }

    /// Snapshot of the child handles, in order.
    pub fn children(&self) -> Vec<DomNode> {
        match &*self.inner {
            NodeInner::Element(element) => element.children.read().clone(),
            NodeInner::Text(_) => Vec::new(),
        }
    }

    pub fn child_count(&self) -> usize {
        match &*self.inner {
            NodeInner::Element(element) => element.children.read().len(),
            NodeInner::Text(_) => 0,
        }
    }

    /// The concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match &*self.inner {
            NodeInner::Text(content) => content.read().clone(),
            NodeInner::Element(element) => element
                .children
                .read()
                .iter()
                .map(DomNode::text_content)
                .collect(),
        }
    }

    /// Depth-first search for the node carrying `id="<id>"`. This is the
    /// lookup channel the mount contract uses.
    pub fn find_by_id(&self, id: &str) -> Option<DomNode> {
        if self.attribute("id").as_deref() == Some(id) {
            return Some(self.clone());
        }
        match &*self.inner {
            NodeInner::Element(element) => element
                .children
                .read()
                .iter()
                .find_map(|child| child.find_by_id(id)),
            NodeInner::Text(_) => None,
        }
    }

    /// Render the subtree as markup. Attributes appear in sorted order and
    /// text is escaped, so the output is deterministic and safe to assert
    /// against in tests.
    pub fn to_html(&self) -> String {
        match &*self.inner {
            NodeInner::Text(content) => escape(&content.read()),
            NodeInner::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in element.attributes.read().iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                let children = element.children.read();
                if children.is_empty() {
                    out.push_str(" />");
                } else {
                    out.push('>');
                    for child in children.iter() {
                        out.push_str(&child.to_html());
                    }
                    out.push_str("</");
                    out.push_str(&element.tag);
                    out.push('>');
                }
                out
            }
        }
    }
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            NodeInner::Text(content) => f.debug_tuple("Text").field(&*content.read()).finish(),
            NodeInner::Element(element) => f
                .debug_struct("Element")
                .field("tag", &element.tag)
                .field("children", &element.children.read().len())
                .finish(),
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
