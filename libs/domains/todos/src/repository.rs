use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::{Todo, TodoChanges};

/// Repository trait for Todo persistence
///
/// Implementations own all persisted state. Every method is a single,
/// independent operation that either fully succeeds or leaves the store
/// untouched. Listings are ordered newest-created first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos, newest first
    async fn find_all(&self) -> RepositoryResult<Vec<Todo>>;

    /// Look up a todo; absence is `Ok(None)`, not an error
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Todo>>;

    /// Todos with the given completion state, newest first
    async fn find_by_completion(&self, completed: bool) -> RepositoryResult<Vec<Todo>>;

    /// Persist a new todo, assigning its id and timestamps
    async fn create(&self, description: String) -> RepositoryResult<Todo>;

    /// Apply a partial update to an existing todo and refresh `updated_at`
    async fn update(&self, id: i32, changes: TodoChanges) -> RepositoryResult<Todo>;

    /// Permanently remove a todo
    async fn delete(&self, id: i32) -> RepositoryResult<()>;

    /// Count todos, optionally only those with the given completion state
    async fn count_by_status(&self, completed: Option<bool>) -> RepositoryResult<u64>;

    /// One page of todos, newest first, plus the total count
    async fn find_page(&self, page: u64, limit: u64) -> RepositoryResult<(Vec<Todo>, u64)>;

    /// Case-insensitive substring search over descriptions, newest first
    async fn search_by_description(&self, term: String) -> RepositoryResult<Vec<Todo>>;
}
