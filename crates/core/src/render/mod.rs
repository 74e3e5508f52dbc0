//! Materialization: turning a [`VNode`] description into a concrete
//! [`DomNode`] tree.
//!
//! The pass is pure on its input; its only effects are constructing new
//! concrete nodes and registering listeners on them. There is no diffing
//! and no reuse: callers that re-render replace the whole subtree.

use thiserror::Error;

use crate::dom::DomNode;
use crate::vnode::{VElement, VNode};

#[cfg(test)]
mod tests;

/// Errors produced by [`materialize`]. Malformed descriptions fail fast
/// with a descriptive error; nothing is silently dropped or replaced by an
/// empty node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An element description carried an empty tag.
    #[error("cannot materialize an element with an empty tag")]
    EmptyTag,
    /// A component at the root of a materialization produced no node.
    /// (Component *children* producing nothing are skipped instead.)
    #[error("component produced no node to materialize")]
    EmptyComponent,
}

/// Materialize a virtual node into a concrete node.
///
/// - Text becomes a text node (numbers are already string-coerced by the
///   [`VNode`] conversions).
/// - An already-materialized node is returned unchanged, so hand-built
///   concrete nodes compose into virtual trees and the operation is
///   idempotent on its own output.
/// - A component thunk is resolved first and its result materialized.
/// - An element gets its literal attributes set, both binding paths
///   registered, and its children materialized in source order.
pub fn materialize(node: &VNode) -> Result<DomNode, RenderError> {
    match node {
        VNode::Text(content) => Ok(DomNode::text(content.clone())),
        VNode::Materialized(existing) => Ok(existing.clone()),
        VNode::Component(thunk) => match thunk.resolve() {
            Some(resolved) => materialize(&resolved),
            None => Err(RenderError::EmptyComponent),
        },
        VNode::Element(element) => materialize_element(element),
    }
}

fn materialize_element(element: &VElement) -> Result<DomNode, RenderError> {
    if element.tag().is_empty() {
        return Err(RenderError::EmptyTag);
    }

    let node = DomNode::element(element.tag());

    for (name, value) in element.attributes() {
        node.set_attribute(name.clone(), value.clone());
    }

    // Dual-path event binding: typed bindings and the open named-event map
    // are registered independently, so the same event name may fire both.
    for (kind, handler) in element.bindings() {
        node.add_event_listener(kind.dom_name(), handler.clone());
    }
    for (name, handler) in element.events() {
        node.add_event_listener(name.clone(), handler.clone());
    }

    for child in element.child_nodes() {
        let resolved = match child {
            VNode::Component(thunk) => match thunk.resolve() {
                Some(produced) => produced,
                // A component child producing nothing renders nothing.
                None => continue,
            },
            other => other.clone(),
        };
        node.append_child(materialize(&resolved)?);
    }

    Ok(node)
}
