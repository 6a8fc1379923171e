use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{NewTodo, Todo, TodoChanges, next_updated_at, now};
use crate::repository::TodoRepository;

#[derive(Default)]
struct Store {
    todos: BTreeMap<i32, Todo>,
    last_id: i32,
}

/// Process-local todo repository.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    store: Mutex<Store>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Storage("in-memory store lock poisoned".to_string()))
    }
}

fn newest_first<'a>(todos: impl Iterator<Item = &'a Todo>) -> Vec<Todo> {
    let mut todos: Vec<Todo> = todos.cloned().collect();
    todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    todos
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Todo>> {
        let store = self.lock()?;
        Ok(newest_first(store.todos.values()))
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Todo>> {
        let store = self.lock()?;
        Ok(store.todos.get(&id).cloned())
    }

    async fn find_by_completion(&self, completed: bool) -> RepositoryResult<Vec<Todo>> {
        let store = self.lock()?;
        Ok(newest_first(
            store.todos.values().filter(|todo| todo.completed == completed),
        ))
    }

    async fn create(&self, description: String) -> RepositoryResult<Todo> {
        let todo = NewTodo::new(&description)?;
        let mut store = self.lock()?;

        let id = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Storage("id sequence exhausted".to_string()))?;
        store.last_id = id;

        let timestamp = now();
        let todo = Todo {
            id,
            completed: todo.completed(),
            description: todo.into_description(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        store.todos.insert(id, todo.clone());

        Ok(todo)
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> RepositoryResult<Todo> {
        let mut store = self.lock()?;
        let existing = store.todos.get(&id).ok_or(RepositoryError::NotFound(id))?;

        let mut todo = existing.clone();
        todo.apply_update(&changes)?;
        todo.updated_at = next_updated_at(existing.updated_at);

        store.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<()> {
        let mut store = self.lock()?;
        store
            .todos
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn count_by_status(&self, completed: Option<bool>) -> RepositoryResult<u64> {
        let store = self.lock()?;
        let count = match completed {
            Some(completed) => store
                .todos
                .values()
                .filter(|todo| todo.completed == completed)
                .count(),
            None => store.todos.len(),
        };
        Ok(count as u64)
    }

    async fn find_page(&self, page: u64, limit: u64) -> RepositoryResult<(Vec<Todo>, u64)> {
        let store = self.lock()?;
        let total = store.todos.len() as u64;
        let skip = page.saturating_sub(1).saturating_mul(limit);

        let todos = newest_first(store.todos.values())
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok((todos, total))
    }

    async fn search_by_description(&self, term: String) -> RepositoryResult<Vec<Todo>> {
        let term = term.to_lowercase();
        let store = self.lock()?;
        Ok(newest_first(
            store
                .todos
                .values()
                .filter(|todo| todo.description.to_lowercase().contains(&term)),
        ))
    }
}
