use super::*;
use crate::dom::{Event, EventHandler};
use crate::vnode::tags::{button, div, li, span, ul};
use crate::vnode::{EventKind, VElement};
use std::sync::{Arc, Mutex};

#[test]
fn test_structure_mirrors_description() {
    let view = div()
        .id("root")
        .child(span().text("hello"))
        .child("plain")
        .child(ul().child(li().text("one")).child(li().text("two")));

    let node = materialize(&view.into()).unwrap();

    assert_eq!(node.tag(), Some("div"));
    assert_eq!(node.attribute("id").as_deref(), Some("root"));

    let children = node.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].tag(), Some("span"));
    assert_eq!(children[0].text_content(), "hello");
    assert!(children[1].is_text());
    assert_eq!(children[1].text_content(), "plain");

    let list_items = children[2].children();
    assert_eq!(list_items.len(), 2);
    let texts: Vec<String> = list_items.iter().map(|n| n.text_content()).collect();
    assert_eq!(texts, ["one", "two"]);
}

#[test]
fn test_primitives_become_text_nodes() {
    let node = materialize(&VNode::from(42)).unwrap();
    assert!(node.is_text());
    assert_eq!(node.text_content(), "42");

    let node = materialize(&VNode::from("words")).unwrap();
    assert_eq!(node.text_content(), "words");
}

#[test]
fn test_materialized_input_passes_through_unchanged() {
    let prebuilt = DomNode::element("canvas");
    let first = materialize(&VNode::Materialized(prebuilt.clone())).unwrap();
    let second = materialize(&VNode::Materialized(first.clone())).unwrap();

    assert!(DomNode::ptr_eq(&prebuilt, &first));
    assert!(DomNode::ptr_eq(&first, &second));
}

#[test]
fn test_prebuilt_nodes_compose_into_virtual_trees() {
    let prebuilt = DomNode::element("pre");
    prebuilt.append_child(DomNode::text("fixed"));

    let view = div().child("before").child(prebuilt.clone()).child("after");
    let node = materialize(&view.into()).unwrap();

    let children = node.children();
    assert_eq!(children.len(), 3);
    assert!(DomNode::ptr_eq(&children[1], &prebuilt));
}

#[test]
fn test_typed_binding_registers_listener_not_attribute() {
    let clicks = Arc::new(Mutex::new(0u32));
    let clicks_in_handler = clicks.clone();
    let view = button()
        .text("go")
        .on(EventKind::Click, move |_: &Event| {
            *clicks_in_handler.lock().unwrap() += 1;
        });

    let node = materialize(&view.into()).unwrap();

    assert_eq!(node.listener_count("click"), 1);
    assert_eq!(node.attribute("onclick"), None);
    assert_eq!(node.attribute("onClick"), None);

    node.dispatch(&Event::new("click"));
    assert_eq!(*clicks.lock().unwrap(), 1);
}

#[test]
fn test_dual_binding_paths_both_fire() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let typed_calls = calls.clone();
    let named_calls = calls.clone();

    let view = button()
        .on(EventKind::Click, move |_: &Event| {
            typed_calls.lock().unwrap().push("typed");
        })
        .event("click", move |_: &Event| {
            named_calls.lock().unwrap().push("named");
        });

    let node = materialize(&view.into()).unwrap();
    assert_eq!(node.listener_count("click"), 2);

    node.dispatch(&Event::new("click"));
    assert_eq!(*calls.lock().unwrap(), ["typed", "named"]);
}

#[test]
fn test_open_event_map_binds_arbitrary_names() {
    let fired = Arc::new(Mutex::new(false));
    let fired_in_handler = fired.clone();
    let view = div().event("custom-sync", move |_: &Event| {
        *fired_in_handler.lock().unwrap() = true;
    });

    let node = materialize(&view.into()).unwrap();
    node.dispatch(&Event::new("custom-sync"));
    assert!(*fired.lock().unwrap());
}

#[test]
fn test_component_child_materialized_in_place() {
    let view = div()
        .child("first")
        .child(VNode::component(|| span().text("x").into()))
        .child("last");

    let node = materialize(&view.into()).unwrap();
    let children = node.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[1].tag(), Some("span"));
    assert_eq!(children[1].text_content(), "x");
}

#[test]
fn test_empty_component_children_are_skipped() {
    let view = div()
        .child("kept")
        .child(VNode::component_opt(|| None))
        .child("also kept");

    let node = materialize(&view.into()).unwrap();
    assert_eq!(node.child_count(), 2);
    assert_eq!(node.text_content(), "keptalso kept");
}

#[test]
fn test_component_at_root_resolves_before_materialization() {
    let view = VNode::component(|| div().id("made").into());
    let node = materialize(&view).unwrap();
    assert_eq!(node.attribute("id").as_deref(), Some("made"));
}

#[test]
fn test_empty_component_at_root_is_an_error() {
    let view = VNode::component_opt(|| None);
    assert_eq!(materialize(&view).unwrap_err(), RenderError::EmptyComponent);
}

#[test]
fn test_empty_tag_is_an_error() {
    let view: VNode = VElement::new("").text("dangling").into();
    assert_eq!(materialize(&view).unwrap_err(), RenderError::EmptyTag);

    // Nested failures propagate; nothing is silently dropped.
    let nested: VNode = div().child(VElement::new("")).into();
    assert_eq!(materialize(&nested).unwrap_err(), RenderError::EmptyTag);
}

#[test]
fn test_rerender_builds_a_fresh_tree() {
    let view = || -> VNode { div().child(span().text("same")).into() };
    let first = materialize(&view()).unwrap();
    let second = materialize(&view()).unwrap();

    // Same shape, different identity: the renderer never reuses nodes.
    assert_eq!(first.to_html(), second.to_html());
    assert!(!DomNode::ptr_eq(&first, &second));
}

#[test]
fn test_handlers_can_be_shared_across_nodes() {
    let count = Arc::new(Mutex::new(0u32));
    let count_in_handler = count.clone();
    let shared = EventHandler::new(move |_: &Event| {
        *count_in_handler.lock().unwrap() += 1;
    });

    let view = div()
        .child(button().on(EventKind::Click, shared.clone()))
        .child(button().on(EventKind::Click, shared));

    let node = materialize(&view.into()).unwrap();
    for child in node.children() {
        child.dispatch(&Event::new("click"));
    }
    assert_eq!(*count.lock().unwrap(), 2);
}

#[test]
fn test_materialize_does_not_mutate_its_input() {
    let view: VNode = div().child(span().text("stable")).into();
    let before = format!("{view:?}");
    let _ = materialize(&view).unwrap();
    assert_eq!(format!("{view:?}"), before);
}
