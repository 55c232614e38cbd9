//! In-memory todo store.
//!
//! # Design
//! The store is a plain ordered `Vec` plus a high-water id counter. It is the
//! only piece of process-wide state; handlers receive it by reference (behind
//! the router's shared state) rather than reaching for a global. All
//! operations are synchronous, bounded, in-memory computations — the coarse
//! lock around the store in `AppState` is the only concurrency control
//! needed.
//!
//! Ids are assigned strictly above every id ever handed out, so deleting the
//! highest record and creating another never reuses the deleted id.

use serde::{Deserialize, Serialize};

/// A single todo record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Fields of a partial update. `None` means "leave unchanged".
///
/// PUT and PATCH both apply only the fields present in the request body; the
/// conflated semantics are intentional and preserved from the observed
/// behavior of the service this mocks.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub user_id: Option<i64>,
}

impl TodoPatch {
    /// Names of the fields this patch would apply, in a fixed order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.completed.is_some() {
            fields.push("completed");
        }
        if self.user_id.is_some() {
            fields.push("userId");
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.user_id.is_none()
    }
}

/// Error returned by [`TodoStore::create`] when the title is empty after
/// trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyTitle;

/// The ordered, mutable collection of todo records.
#[derive(Debug, Clone)]
pub struct TodoStore {
    todos: Vec<Todo>,
    next_id: i64,
}

impl TodoStore {
    /// An empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
        }
    }

    /// The default development dataset: five records, ids 1 through 5.
    pub fn seeded() -> Self {
        let todos = vec![
            Todo {
                user_id: 1,
                id: 1,
                title: "Buy groceries".to_string(),
                completed: false,
            },
            Todo {
                user_id: 1,
                id: 2,
                title: "Walk the dog".to_string(),
                completed: true,
            },
            Todo {
                user_id: 2,
                id: 3,
                title: "Write monthly report".to_string(),
                completed: false,
            },
            Todo {
                user_id: 1,
                id: 4,
                title: "Water the plants".to_string(),
                completed: false,
            },
            Todo {
                user_id: 2,
                id: 5,
                title: "Book dentist appointment".to_string(),
                completed: false,
            },
        ];
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self { todos, next_id }
    }

    /// Records in insertion order, optionally filtered by exact `userId`
    /// match and truncated to `limit`.
    pub fn list(&self, user_id: Option<i64>, limit: Option<usize>) -> Vec<Todo> {
        let filtered = self
            .todos
            .iter()
            .filter(|t| user_id.is_none_or(|u| t.user_id == u))
            .cloned();
        match limit {
            Some(n) => filtered.take(n).collect(),
            None => filtered.collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<Todo> {
        self.todos.iter().find(|t| t.id == id).cloned()
    }

    /// Appends a new record and returns it.
    ///
    /// The assigned id is `max(ids ever assigned, 0) + 1`; deleted ids are
    /// never handed out again.
    pub fn create(&mut self, title: &str, completed: bool, user_id: i64) -> Result<Todo, EmptyTitle> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EmptyTitle);
        }
        let todo = Todo {
            user_id,
            id: self.next_id,
            title: title.to_string(),
            completed,
        };
        self.next_id += 1;
        self.todos.push(todo.clone());
        Ok(todo)
    }

    /// Applies only the fields present in `patch`, returning the updated
    /// record. `title` is trimmed when present.
    pub fn update(&mut self, id: i64, patch: &TodoPatch) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        if let Some(title) = &patch.title {
            todo.title = title.trim().to_string();
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        if let Some(user_id) = patch.user_id {
            todo.user_id = user_id;
        }
        Some(todo.clone())
    }

    /// Removes and returns the record; the order of the remaining records is
    /// preserved.
    pub fn delete(&mut self, id: i64) -> Option<Todo> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(index))
    }

    /// Flips `completed` to its negation.
    pub fn toggle(&mut self, id: i64) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(todo.clone())
    }

    pub fn set_completed(&mut self, id: i64, completed: bool) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.completed = completed;
        Some(todo.clone())
    }

    /// Ids of all stored records, in insertion order. Used for 404 context.
    pub fn ids(&self) -> Vec<i64> {
        self.todos.iter().map(|t| t.id).collect()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}
