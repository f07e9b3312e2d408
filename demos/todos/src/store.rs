use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Todo {
    pub(crate) id: u64,
    pub(crate) message: String,
}

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
}

/// In-memory todo table shared by all requests through the depot.
///
/// Ids come from a counter and are never reused, so a stale delete form can not
/// remove a todo created after it was rendered.
#[derive(Clone, Debug, Default)]
pub(crate) struct TodoStore {
    inner: Arc<Mutex<Inner>>,
}

impl TodoStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create(&self, message: impl Into<String>) -> u64 {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.todos.push(Todo {
            id,
            message: message.into(),
        });
        id
    }

    pub(crate) fn delete(&self, id: u64) -> bool {
        let mut inner = self.inner.lock();
        let len = inner.todos.len();
        inner.todos.retain(|todo| todo.id != id);
        inner.todos.len() != len
    }

    pub(crate) fn read_all(&self) -> Vec<Todo> {
        self.inner.lock().todos.clone()
    }
}
