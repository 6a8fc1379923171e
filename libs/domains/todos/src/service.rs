use observability::TodoMetrics;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{TodoError, TodoResult};
use crate::models::{
    CreateTodoRequest, DeleteTodoRequest, PageParams, Todo, TodoPage, TodoStats,
    UpdateTodoRequest,
};
use crate::repository::TodoRepository;
use crate::validation::{
    validate_boolean, validate_create_request, validate_delete_request, validate_id,
    validate_page, validate_search_term, validate_update_request,
};

/// Transport-neutral todo operations.
///
/// Both the REST handlers and the gRPC service hand their raw requests to
/// this type. Each operation validates first, makes its repository call, then
/// classifies any failure into a [`TodoError`]. The service keeps no state of
/// its own and is shared behind an `Arc`.
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All todos, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> TodoResult<Vec<Todo>> {
        observe("list", async {
            self.repository
                .find_all()
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to retrieve todos"))
        })
        .await
    }

    /// Todos filtered by completion state
    #[instrument(skip(self, completed))]
    pub async fn list_by_status(&self, completed: Option<Value>) -> TodoResult<Vec<Todo>> {
        observe("list_by_status", async {
            let completed = validate_boolean(completed.as_ref(), "completed")?;

            self.repository
                .find_by_completion(completed)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to retrieve todos"))
        })
        .await
    }

    #[instrument(skip(self, id), fields(todo_id = tracing::field::Empty))]
    pub async fn get(&self, id: Option<Value>) -> TodoResult<Todo> {
        observe("get", async {
            let id = validate_id(id.as_ref(), "id")?;
            tracing::Span::current().record("todo_id", id);

            self.repository
                .find_by_id(id)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to retrieve todo"))?
                .ok_or(TodoError::NotFound(id))
        })
        .await
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateTodoRequest) -> TodoResult<Todo> {
        observe("create", async {
            let description = validate_create_request(&request)?;

            let todo = self
                .repository
                .create(description)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to create todo"))?;

            tracing::info!(todo_id = todo.id, "Todo created");
            Ok(todo)
        })
        .await
    }

    #[instrument(skip(self, request), fields(todo_id = tracing::field::Empty))]
    pub async fn update(&self, request: UpdateTodoRequest) -> TodoResult<Todo> {
        observe("update", async {
            let update = validate_update_request(&request)?;
            tracing::Span::current().record("todo_id", update.id);

            let todo = self
                .repository
                .update(update.id, update.changes)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to update todo"))?;

            tracing::info!(todo_id = todo.id, completed = todo.completed, "Todo updated");
            Ok(todo)
        })
        .await
    }

    /// Permanently delete a todo.
    ///
    /// Deleting an id that is already gone fails with `NotFound`.
    #[instrument(skip(self, request), fields(todo_id = tracing::field::Empty))]
    pub async fn delete(&self, request: DeleteTodoRequest) -> TodoResult<()> {
        observe("delete", async {
            let id = validate_delete_request(&request)?;
            tracing::Span::current().record("todo_id", id);

            self.repository
                .delete(id)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to delete todo"))?;

            tracing::info!(todo_id = id, "Todo deleted");
            Ok(())
        })
        .await
    }

    /// Counts of all, completed and incomplete todos
    #[instrument(skip(self))]
    pub async fn stats(&self) -> TodoResult<TodoStats> {
        observe("stats", async {
            let count = |completed| async move {
                self.repository
                    .count_by_status(completed)
                    .await
                    .map_err(|e| TodoError::from_repository(e, "Failed to get todo count"))
            };

            let total = count(None).await?;
            let completed = count(Some(true)).await?;
            let incomplete = count(Some(false)).await?;

            TodoMetrics::set_counts(completed, incomplete);

            Ok(TodoStats {
                total,
                completed,
                incomplete,
            })
        })
        .await
    }

    #[instrument(skip(self, params))]
    pub async fn page(&self, params: PageParams) -> TodoResult<TodoPage> {
        observe("page", async {
            let (page, limit) = validate_page(&params)?;

            let (todos, total) = self
                .repository
                .find_page(page, limit)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to retrieve todos"))?;

            Ok(TodoPage {
                todos,
                total,
                page,
                limit,
                total_pages: total.div_ceil(limit),
            })
        })
        .await
    }

    /// Case-insensitive description search, newest first
    #[instrument(skip(self, term))]
    pub async fn search(&self, term: Option<Value>) -> TodoResult<Vec<Todo>> {
        observe("search", async {
            let term = validate_search_term(term.as_ref())?;

            self.repository
                .search_by_description(term)
                .await
                .map_err(|e| TodoError::from_repository(e, "Failed to search todos"))
        })
        .await
    }
}

async fn observe<T, F>(operation: &'static str, future: F) -> TodoResult<T>
where
    F: Future<Output = TodoResult<T>>,
{
    let timer = TodoMetrics::start(operation);
    let result = future.await;

    match &result {
        Ok(_) => timer.finish("ok"),
        Err(err) => {
            tracing::debug!(operation, kind = %err.kind(), error = %err, "Todo operation failed");
            timer.finish(err.kind().into());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, RepositoryError};
    use crate::models::TodoChanges;
    use crate::repository::MockTodoRepository;
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::json;

    fn todo(id: i32, description: &str, completed: bool) -> Todo {
        let now = Utc::now();
        Todo {
            id,
            description: description.to_string(),
            completed,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_request(description: Value) -> CreateTodoRequest {
        CreateTodoRequest {
            description: Some(description),
        }
    }

    #[tokio::test]
    async fn test_create_passes_trimmed_description() {
        let mut repo = MockTodoRepository::new();
        repo.expect_create()
            .with(eq("Buy groceries".to_string()))
            .times(1)
            .returning(|d| Ok(todo(1, &d, false)));

        let service = TodoService::new(repo);
        let created = service
            .create(create_request(json!("  Buy groceries  ")))
            .await
            .unwrap();

        assert_eq!(created.description, "Buy groceries");
        assert!(!created.completed);
    }

    #[tokio::test]
    async fn test_create_invalid_never_reaches_repository() {
        let mut repo = MockTodoRepository::new();
        repo.expect_create().never();

        let service = TodoService::new(repo);

        for bad in [json!(""), json!("   "), json!("x".repeat(501)), json!(5)] {
            let err = service.create(create_request(bad)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        let err = service
            .create(CreateTodoRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "description is required");
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_internal_and_generic() {
        let mut repo = MockTodoRepository::new();
        repo.expect_create()
            .returning(|_| Err(RepositoryError::Storage("disk full".to_string())));

        let service = TodoService::new(repo);
        let err = service
            .create(create_request(json!("Buy groceries")))
            .await
            .unwrap_err();

        assert_eq!(err, TodoError::Internal("Failed to create todo".to_string()));
    }

    #[tokio::test]
    async fn test_update_without_fields_is_invalid_for_any_id() {
        let mut repo = MockTodoRepository::new();
        repo.expect_update().never();

        let service = TodoService::new(repo);

        for id in [json!(1), json!(-1), json!("abc")] {
            let err = service
                .update(UpdateTodoRequest {
                    id: Some(id),
                    ..Default::default()
                })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[tokio::test]
    async fn test_update_not_found_names_id() {
        let mut repo = MockTodoRepository::new();
        repo.expect_update()
            .with(
                eq(999999),
                eq(TodoChanges {
                    description: Some("x".to_string()),
                    completed: None,
                }),
            )
            .returning(|id, _| Err(RepositoryError::NotFound(id)));

        let service = TodoService::new(repo);
        let err = service
            .update(UpdateTodoRequest {
                id: Some(json!(999999)),
                description: Some(json!("x")),
                completed: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("999999"));
    }

    #[tokio::test]
    async fn test_update_repository_invalid_field_is_invalid_argument() {
        let mut repo = MockTodoRepository::new();
        repo.expect_update().returning(|_, _| {
            Err(RepositoryError::InvalidField(
                crate::validation::ValidationError::Empty {
                    field: "description",
                },
            ))
        });

        let service = TodoService::new(repo);
        let err = service
            .update(UpdateTodoRequest {
                id: Some(json!(1)),
                description: Some(json!("ok")),
                completed: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_delete_validates_id_first() {
        let mut repo = MockTodoRepository::new();
        repo.expect_delete().never();

        let service = TodoService::new(repo);
        let err = service
            .delete(DeleteTodoRequest { id: Some(json!(0)) })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "id must be a positive integer");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repo = MockTodoRepository::new();
        repo.expect_delete()
            .with(eq(7))
            .returning(|id| Err(RepositoryError::NotFound(id)));

        let service = TodoService::new(repo);
        let err = service
            .delete(DeleteTodoRequest { id: Some(json!(7)) })
            .await
            .unwrap_err();

        assert_eq!(err, TodoError::NotFound(7));
    }

    #[tokio::test]
    async fn test_get_absent_is_not_found() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id().with(eq(3)).returning(|_| Ok(None));

        let service = TodoService::new(repo);
        let err = service.get(Some(json!("3"))).await.unwrap_err();

        assert_eq!(err, TodoError::NotFound(3));
    }

    #[tokio::test]
    async fn test_list_storage_failure_is_internal() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_all()
            .returning(|| Err(RepositoryError::Storage("timeout".to_string())));

        let service = TodoService::new(repo);
        let err = service.list().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn test_list_by_status_requires_boolean() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_completion()
            .with(eq(true))
            .returning(|_| Ok(vec![todo(2, "done", true)]));

        let service = TodoService::new(repo);
        assert_eq!(
            service.list_by_status(Some(json!(true))).await.unwrap().len(),
            1
        );

        let err = service
            .list_by_status(Some(json!("yes")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "completed must be a boolean");
    }

    #[tokio::test]
    async fn test_stats_combines_counts() {
        let mut repo = MockTodoRepository::new();
        repo.expect_count_by_status().returning(|completed| {
            Ok(match completed {
                None => 5,
                Some(true) => 2,
                Some(false) => 3,
            })
        });

        let service = TodoService::new(repo);
        let stats = service.stats().await.unwrap();

        assert_eq!(
            stats,
            TodoStats {
                total: 5,
                completed: 2,
                incomplete: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_page_computes_total_pages() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_page()
            .with(eq(2), eq(10))
            .returning(|_, _| Ok((vec![todo(1, "a", false)], 21)));

        let service = TodoService::new(repo);
        let page = service
            .page(PageParams {
                page: Some(2),
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 21);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.limit, 10);
    }

    #[tokio::test]
    async fn test_search_trims_term() {
        let mut repo = MockTodoRepository::new();
        repo.expect_search_by_description()
            .with(eq("milk".to_string()))
            .returning(|_| Ok(vec![]));

        let service = TodoService::new(repo);
        assert!(service.search(Some(json!(" milk "))).await.unwrap().is_empty());
    }
}
