//! The to-do store: actions and selectors over a shared [`Store`].

use ripple::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub editing: bool,
}

/// A handle over the application store exposing to-do actions and
/// selectors. Clones share the same store.
#[derive(Clone)]
pub struct TodoStore {
    store: Store,
}

impl TodoStore {
    pub fn new() -> Self {
        let store = Store::from_json(json!({
            "todos": [],
            "filter": "all",
            "next_id": 1
        }))
        .expect("initial to-do state is an object");
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ---- actions ----

    pub fn add_todo(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let next_id = self.next_id();
        let mut todos = self.todos();
        todos.push(Todo {
            id: next_id,
            text: trimmed.to_string(),
            completed: false,
            editing: false,
        });
        self.store
            .set(patch(json!({ "todos": todos, "next_id": next_id + 1 })));
    }

    pub fn delete_todo(&self, id: u64) {
        let todos: Vec<Todo> = self.todos().into_iter().filter(|t| t.id != id).collect();
        self.write_todos(todos);
    }

    pub fn toggle_todo(&self, id: u64) {
        self.map_todos(|todo| {
            if todo.id == id {
                todo.completed = !todo.completed;
            }
        });
    }

    /// Put one item into editing mode and take every other item out of it.
    pub fn start_editing(&self, id: u64) {
        self.map_todos(|todo| todo.editing = todo.id == id);
    }

    /// An empty replacement text deletes the item, mirroring the usual
    /// to-do list behavior.
    pub fn save_edit(&self, id: u64, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.delete_todo(id);
            return;
        }
        self.map_todos(|todo| {
            if todo.id == id {
                todo.text = trimmed.to_string();
                todo.editing = false;
            }
        });
    }

    pub fn cancel_edit(&self, id: u64) {
        self.map_todos(|todo| {
            if todo.id == id {
                todo.editing = false;
            }
        });
    }

    pub fn toggle_all(&self) {
        let target = !self.all_completed();
        self.map_todos(|todo| todo.completed = target);
    }

    pub fn clear_completed(&self) {
        let todos: Vec<Todo> = self.todos().into_iter().filter(|t| !t.completed).collect();
        self.write_todos(todos);
    }

    pub fn set_filter(&self, filter: &str) {
        self.store.set(patch(json!({ "filter": filter })));
    }

    // ---- selectors ----

    pub fn todos(&self) -> Vec<Todo> {
        let state = self.store.get();
        state
            .get("todos")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    pub fn filter(&self) -> String {
        self.store
            .get()
            .get("filter")
            .and_then(Value::as_str)
            .unwrap_or("all")
            .to_string()
    }

    pub fn filtered_todos(&self) -> Vec<Todo> {
        let todos = self.todos();
        match self.filter().as_str() {
            "active" => todos.into_iter().filter(|t| !t.completed).collect(),
            "completed" => todos.into_iter().filter(|t| t.completed).collect(),
            _ => todos,
        }
    }

    pub fn active_count(&self) -> usize {
        self.todos().iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos().iter().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        let todos = self.todos();
        !todos.is_empty() && todos.iter().all(|t| t.completed)
    }

    fn next_id(&self) -> u64 {
        self.store
            .get()
            .get("next_id")
            .and_then(Value::as_u64)
            .unwrap_or(1)
    }

    fn map_todos(&self, mut apply: impl FnMut(&mut Todo)) {
        let mut todos = self.todos();
        for todo in &mut todos {
            apply(todo);
        }
        self.write_todos(todos);
    }

    fn write_todos(&self, todos: Vec<Todo>) {
        self.store.set(patch(json!({ "todos": todos })));
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn patch(value: Value) -> State {
    value.as_object().cloned().unwrap_or_default()
}
