mod store;

use ripple::prelude::*;
use store::{Todo, TodoStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let todos = TodoStore::new();

    let routes = RouteTable::new().route("/", {
        let todos = todos.clone();
        move || todo_page(&todos)
    });
    let app = App::new(routes);

    let body = DomNode::element("body");
    let container = DomNode::element("div");
    container.set_attribute("id", "app");
    body.append_child(container.clone());

    app.mount(&body, "app")?;
    tracing::info!(route = ?app.current_route(), "to-do app mounted");
    {
        let app = app.clone();
        todos.store().subscribe(move |_| app.rerender());
    }

    // A scripted session standing in for user input.
    submit(&container, "new-todo", "Buy milk");
    submit(&container, "new-todo", "Write the report");
    submit(&container, "new-todo", "   ");
    println!("--- after adding two items ---\n{}\n", container.to_html());

    change(&container, "toggle-1");
    println!("--- after completing the first ---\n{}\n", container.to_html());

    click(&container, "filter-active");
    println!("--- active filter ---\n{}\n", container.to_html());
    click(&container, "filter-all");

    dblclick(&container, "label-2");
    if let Some(edit) = container.find_by_id("edit-2") {
        edit.dispatch(
            &Event::new("keyup")
                .with_key("Enter")
                .with_value("Write the quarterly report"),
        );
    }
    println!("--- after editing the second ---\n{}\n", container.to_html());

    click(&container, "clear-completed");
    println!("--- after clearing completed ---\n{}", container.to_html());

    Ok(())
}

fn click(container: &DomNode, id: &str) {
    if let Some(node) = container.find_by_id(id) {
        node.dispatch(&Event::new("click"));
    }
}

fn change(container: &DomNode, id: &str) {
    if let Some(node) = container.find_by_id(id) {
        node.dispatch(&Event::new("change"));
    }
}

fn dblclick(container: &DomNode, id: &str) {
    if let Some(node) = container.find_by_id(id) {
        node.dispatch(&Event::new("dblclick"));
    }
}

fn submit(container: &DomNode, id: &str, text: &str) {
    if let Some(node) = container.find_by_id(id) {
        node.dispatch(&Event::new("keypress").with_key("Enter").with_value(text));
    }
}

fn todo_page(todos: &TodoStore) -> VNode {
    tags::section()
        .class("todoapp")
        .child(todo_header(todos))
        .child(todo_main(todos))
        .child(todo_footer(todos))
        .into()
}

fn todo_header(todos: &TodoStore) -> VElement {
    let on_keypress = {
        let todos = todos.clone();
        move |event: &Event| {
            if event.key() == Some("Enter") {
                if let Some(value) = event.value() {
                    todos.add_todo(value);
                }
            }
        }
    };
    tags::header()
        .class("header")
        .child(tags::h1().text("todos"))
        .child(
            tags::input()
                .id("new-todo")
                .class("new-todo")
                .attr("placeholder", "What needs to be done?")
                .on(EventKind::KeyPress, on_keypress),
        )
}

fn todo_main(todos: &TodoStore) -> VElement {
    let toggle_all = {
        let todos = todos.clone();
        move |_: &Event| todos.toggle_all()
    };
    let mut toggle = tags::input()
        .id("toggle-all")
        .class("toggle-all")
        .attr("type", "checkbox")
        .on(EventKind::Change, toggle_all);
    if todos.all_completed() {
        toggle = toggle.attr("checked", "checked");
    }

    tags::section().class("main").child(toggle).child(
        tags::ul().class("todo-list").children(
            todos
                .filtered_todos()
                .into_iter()
                .map(|todo| todo_item(todos, todo).into()),
        ),
    )
}

fn todo_item(todos: &TodoStore, todo: Todo) -> VElement {
    let mut item = tags::li().attr("data-id", todo.id.to_string());
    if todo.completed {
        item = item.class("completed");
    }

    if todo.editing {
        let on_keyup = {
            let todos = todos.clone();
            let id = todo.id;
            move |event: &Event| match event.key() {
                Some("Enter") => {
                    if let Some(value) = event.value() {
                        todos.save_edit(id, value);
                    }
                }
                Some("Escape") => todos.cancel_edit(id),
                _ => {}
            }
        };
        let on_blur = {
            let todos = todos.clone();
            let id = todo.id;
            move |event: &Event| {
                if let Some(value) = event.value() {
                    todos.save_edit(id, value);
                }
            }
        };
        return item.class("editing").child(
            tags::input()
                .id(format!("edit-{}", todo.id))
                .class("edit")
                .attr("value", todo.text)
                .on(EventKind::KeyUp, on_keyup)
                .on(EventKind::Blur, on_blur),
        );
    }

    let on_toggle = {
        let todos = todos.clone();
        let id = todo.id;
        move |_: &Event| todos.toggle_todo(id)
    };
    let on_edit = {
        let todos = todos.clone();
        let id = todo.id;
        move |_: &Event| todos.start_editing(id)
    };
    let on_destroy = {
        let todos = todos.clone();
        let id = todo.id;
        move |_: &Event| todos.delete_todo(id)
    };

    let mut checkbox = tags::input()
        .id(format!("toggle-{}", todo.id))
        .class("toggle")
        .attr("type", "checkbox")
        .on(EventKind::Change, on_toggle);
    if todo.completed {
        checkbox = checkbox.attr("checked", "checked");
    }

    item.child(
        tags::div()
            .class("view")
            .child(checkbox)
            .child(
                tags::label()
                    .id(format!("label-{}", todo.id))
                    .text(todo.text.clone())
                    .on(EventKind::DblClick, on_edit),
            )
            .child(
                tags::button()
                    .id(format!("destroy-{}", todo.id))
                    .class("destroy")
                    .text("x")
                    .on(EventKind::Click, on_destroy),
            ),
    )
}

fn todo_footer(todos: &TodoStore) -> VElement {
    let active = todos.active_count();
    let unit = if active == 1 { "item" } else { "items" };
    let current = todos.filter();

    let mut footer = tags::footer()
        .class("footer")
        .child(
            tags::span()
                .class("todo-count")
                .text(format!("{active} {unit} left")),
        )
        .child(
            tags::ul()
                .class("filters")
                .child(filter_button(todos, &current, "all"))
                .child(filter_button(todos, &current, "active"))
                .child(filter_button(todos, &current, "completed")),
        );

    if todos.completed_count() > 0 {
        let on_clear = {
            let todos = todos.clone();
            move |_: &Event| todos.clear_completed()
        };
        footer = footer.child(
            tags::button()
                .id("clear-completed")
                .class("clear-completed")
                .text("Clear completed")
                .on(EventKind::Click, on_clear),
        );
    }
    footer
}

fn filter_button(todos: &TodoStore, current: &str, filter: &'static str) -> VElement {
    let on_select = {
        let todos = todos.clone();
        move |_: &Event| todos.set_filter(filter)
    };
    let mut button = tags::button()
        .id(format!("filter-{filter}"))
        .text(filter)
        .on(EventKind::Click, on_select);
    if current == filter {
        button = button.class("selected");
    }
    tags::li().child(button)
}
