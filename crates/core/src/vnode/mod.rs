//! The virtual-node model: a plain, behavior-free description of UI
//! structure that the renderer materializes into concrete nodes.
//!
//! Descriptions are cheap to rebuild, and the toolkit rebuilds them on every
//! render pass; nothing here carries identity across renders.

use std::fmt;
use std::sync::Arc;

use crate::dom::{DomNode, EventHandler};

pub mod tags;


/// The closed set of events an element description can bind through its
/// typed binding list.
///
/// This replaces the source convention of sniffing `on*` attribute names:
/// a binding is an `(EventKind, handler)` pair, and literal attributes can
/// never be mistaken for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DblClick,
    Input,
    Change,
    KeyPress,
    KeyUp,
    KeyDown,
    Submit,
    Focus,
    Blur,
    MouseOver,
    MouseOut,
}

impl EventKind {
    pub const ALL: [EventKind; 12] = [
        EventKind::Click,
        EventKind::DblClick,
        EventKind::Input,
        EventKind::Change,
        EventKind::KeyPress,
        EventKind::KeyUp,
        EventKind::KeyDown,
        EventKind::Submit,
        EventKind::Focus,
        EventKind::Blur,
        EventKind::MouseOver,
        EventKind::MouseOut,
    ];

    /// The lower-case event name listeners are registered under.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::KeyPress => "keypress",
            EventKind::KeyUp => "keyup",
            EventKind::KeyDown => "keydown",
            EventKind::Submit => "submit",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseOut => "mouseout",
        }
    }

    /// Parse an attribute-style name (`"onClick"`, `"onclick"`) into the
    /// event it would have bound. Returns `None` for names outside the
    /// reserved convention.
    pub fn from_attr_name(name: &str) -> Option<Self> {
        let suffix = name.strip_prefix("on").or_else(|| name.strip_prefix("On"))?;
        let lowered = suffix.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.dom_name() == lowered)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_name())
    }
}

/// A zero-argument component function producing a [`VNode`], or `None` for
/// "nothing to render".
///
/// Thunks are resolved immediately at render time; there is no persisted
/// component identity and no memoization.
pub struct ComponentThunk {
    producer: Arc<dyn Fn() -> Option<VNode> + Send + Sync>,
}

impl ComponentThunk {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> Option<VNode> + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Invoke the component function.
    pub fn resolve(&self) -> Option<VNode> {
        (self.producer)()
    }
}

impl Clone for ComponentThunk {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
        }
    }
}

impl fmt::Debug for ComponentThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentThunk")
    }
}

/// A virtual node: the input contract of the renderer.
#[derive(Debug, Clone)]
pub enum VNode {
    /// A text leaf.
    Text(String),
    /// An element description.
    Element(VElement),
    /// An already-materialized concrete node, passed through unchanged.
    Materialized(DomNode),
    /// A deferred component, resolved at render time.
    Component(ComponentThunk),
}

impl VNode {
    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text(content.into())
    }

    /// Wrap a component function that always produces a node.
    pub fn component<F>(producer: F) -> Self
    where
        F: Fn() -> VNode + Send + Sync + 'static,
    {
        VNode::Component(ComponentThunk::new(move || Some(producer())))
    }

    /// Wrap a component function that may produce nothing; `None` children
    /// are skipped by the renderer.
    pub fn component_opt<F>(producer: F) -> Self
    where
        F: Fn() -> Option<VNode> + Send + Sync + 'static,
    {
        VNode::Component(ComponentThunk::new(producer))
    }
}

impl From<VElement> for VNode {
    fn from(element: VElement) -> Self {
        VNode::Element(element)
    }
}

impl From<DomNode> for VNode {
    fn from(node: DomNode) -> Self {
        VNode::Materialized(node)
    }
}

impl From<ComponentThunk> for VNode {
    fn from(thunk: ComponentThunk) -> Self {
        VNode::Component(thunk)
    }
}

impl From<&str> for VNode {
    fn from(content: &str) -> Self {
        VNode::Text(content.to_string())
    }
}

impl From<String> for VNode {
    fn from(content: String) -> Self {
        VNode::Text(content)
    }
}

macro_rules! vnode_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for VNode {
                fn from(value: $ty) -> Self {
                    VNode::Text(value.to_string())
                }
            }
        )*
    };
}

vnode_from_number!(i32, i64, u32, u64, usize, f32, f64);

/// An element description: tag, literal attributes, typed event bindings,
/// an open named-event map, and ordered children.
///
/// The two binding paths are independent: a [`EventKind`] binding and an
/// [`VElement::event`] entry for the same event name both fire.
#[derive(Debug, Clone)]
pub struct VElement {
    tag: String,
    attributes: Vec<(String, String)>,
    bindings: Vec<(EventKind, EventHandler)>,
    events: Vec<(String, EventHandler)>,
    children: Vec<VNode>,
}

impl VElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            bindings: Vec::new(),
            events: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set a literal attribute.
    ///
    /// Names matching the reserved `on<Event>` convention are rejected so
    /// they can never land on a concrete node as literal attributes; use
    /// [`VElement::on`] for those.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if EventKind::from_attr_name(&name).is_some() {
            tracing::warn!(
                attribute = %name,
                "reserved event-attribute name ignored; bind it with `on` instead"
            );
            return self;
        }
        self.attributes.push((name, value.into()));
        self
    }

    /// Append to the `class` attribute, space-separated.
    pub fn class(mut self, class_name: impl AsRef<str>) -> Self {
        if let Some(position) = self.attributes.iter().position(|(name, _)| name == "class") {
            let value = &mut self.attributes[position].1;
            value.push(' ');
            value.push_str(class_name.as_ref());
        } else {
            self.attributes
                .push(("class".to_string(), class_name.as_ref().to_string()));
        }
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    /// Bind a handler for one of the recognized events.
    pub fn on(mut self, kind: EventKind, handler: impl Into<EventHandler>) -> Self {
        self.bindings.push((kind, handler.into()));
        self
    }

    /// Bind a handler under an arbitrary event name. This is the second,
    /// independent binding path; it is not deduplicated against `on`.
    pub fn event(mut self, name: impl Into<String>, handler: impl Into<EventHandler>) -> Self {
        self.events.push((name.into(), handler.into()));
        self
    }

    /// Append a child node (element, text, materialized node or thunk).
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a sequence of children in order.
    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a text child.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(VNode::text(content))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn bindings(&self) -> &[(EventKind, EventHandler)] {
        &self.bindings
    }

    pub fn events(&self) -> &[(String, EventHandler)] {
        &self.events
    }

    pub fn child_nodes(&self) -> &[VNode] {
        &self.children
    }
}
