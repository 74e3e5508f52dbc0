use ripple::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Store::from_json(json!({
        "count": 0,
        "message": "Hello from ripple!"
    }))?;
    let location = Location::new();

    let routes = RouteTable::new()
        .route("/", {
            let location = location.clone();
            move || home(&location)
        })
        .route("/about", {
            let location = location.clone();
            move || about(&location)
        })
        .route("/counter", {
            let store = store.clone();
            let location = location.clone();
            move || counter(&store, &location)
        });

    let app = App::with_location(location, routes);

    // The host page: a document root exposing the container the app
    // mounts into.
    let body = DomNode::element("body");
    let container = DomNode::element("div");
    container.set_attribute("id", "app");
    body.append_child(container.clone());

    app.mount(&body, "app")?;
    tracing::info!(route = ?app.current_route(), "initial route resolved");

    // Full rebuild on every state change.
    {
        let app = app.clone();
        store.subscribe(move |_| app.rerender());
    }

    println!("--- initial render ---\n{}\n", container.to_html());

    app.navigate("#/counter");
    println!("--- /counter ---\n{}\n", container.to_html());

    for _ in 0..3 {
        click(&container, "increment");
    }
    click(&container, "decrement");
    println!(
        "--- after three increments and one decrement ---\n{}\n",
        container.to_html()
    );

    click(&container, "reset");
    println!("--- after reset ---\n{}\n", container.to_html());

    // Unknown fragments fall through to the placeholder.
    app.navigate("#/missing");
    println!("--- /missing ---\n{}\n", container.to_html());

    app.navigate("/about");
    println!("--- /about ---\n{}", container.to_html());

    Ok(())
}

/// Re-find the node on every use: each render pass builds a fresh tree.
fn click(container: &DomNode, id: &str) {
    if let Some(node) = container.find_by_id(id) {
        node.dispatch(&Event::new("click"));
    }
}

fn patch(value: Value) -> State {
    value.as_object().cloned().unwrap_or_default()
}

/// A reusable navigation button.
fn nav_button(location: &Location, label: &str, target: &str) -> VElement {
    let location = location.clone();
    let target = target.to_string();
    tags::button()
        .class("nav-button")
        .text(label)
        .on(EventKind::Click, move |_: &Event| location.navigate(&target))
}

fn home(location: &Location) -> VNode {
    tags::div()
        .class("home-page")
        .child(tags::h1().text("Home"))
        .child(tags::p().text("Welcome to the ripple toolkit!"))
        .child(
            tags::div()
                .child(nav_button(location, "Go to About", "/about"))
                .child(nav_button(location, "Go to Counter", "/counter")),
        )
        .into()
}

fn about(location: &Location) -> VNode {
    tags::div()
        .class("about-page")
        .child(tags::h1().text("About"))
        .child(tags::p().text("This toolkit provides:"))
        .child(
            tags::ul()
                .child(tags::li().text("a virtual-node renderer"))
                .child(tags::li().text("a fragment router"))
                .child(tags::li().text("a pub/sub state store")),
        )
        .child(nav_button(location, "Back home", "/"))
        .into()
}

fn counter(store: &Store, location: &Location) -> VNode {
    let state = store.get();
    let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
    let message = state
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let step = |store: &Store, delta: i64| {
        let store = store.clone();
        move |_: &Event| {
            store.update(|state| {
                let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
                patch(json!({ "count": count + delta }))
            });
        }
    };
    let reset = {
        let store = store.clone();
        move |_: &Event| {
            store.set(patch(json!({ "count": 0, "message": "Counter reset" })));
        }
    };

    tags::div()
        .class("counter-page")
        .child(tags::h1().text("Counter"))
        .child(
            tags::div()
                .class("counter-display")
                .child(tags::p().class("count").text(format!("Value: {count}")))
                .child(tags::p().text(format!("Message: {message}"))),
        )
        .child(
            tags::div()
                .child(
                    tags::button()
                        .id("increment")
                        .text("+1")
                        .on(EventKind::Click, step(store, 1)),
                )
                .child(
                    tags::button()
                        .id("decrement")
                        .text("-1")
                        .on(EventKind::Click, step(store, -1)),
                )
                .child(tags::button().id("reset").text("Reset").on(EventKind::Click, reset)),
        )
        .child(nav_button(location, "Back home", "/"))
        .into()
}
