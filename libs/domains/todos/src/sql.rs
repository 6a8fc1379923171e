use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use tracing::instrument;

use crate::entity;
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{NewTodo, Todo, TodoChanges, next_updated_at};
use crate::repository::TodoRepository;

/// Todo repository backed by a SQL database through SeaORM.
///
/// Works against PostgreSQL and SQLite; the schema comes from the
/// `migration` crate.
#[derive(Clone)]
pub struct SqlTodoRepository {
    db: DatabaseConnection,
}

impl SqlTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn newest_first(query: Select<entity::Entity>) -> Select<entity::Entity> {
        query
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
    }

    async fn find_model(&self, id: i32) -> RepositoryResult<entity::Model> {
        entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }
}

/// Map a failed `UPDATE` for `id`; matching no row means the todo is gone.
fn update_error(id: i32, err: DbErr) -> RepositoryError {
    match err {
        DbErr::RecordNotUpdated => RepositoryError::NotFound(id),
        other => other.into(),
    }
}

/// `LIKE` pattern matching `term` as a literal substring, escaped with a backslash.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Bound OFFSET by what the SQL drivers bind (a signed 64-bit integer).
fn page_offset(page: u64, limit: u64) -> u64 {
    Ord::min(page.saturating_sub(1).saturating_mul(limit), i64::MAX as u64)
}

#[async_trait]
impl TodoRepository for SqlTodoRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Todo>> {
        let models = Self::newest_first(entity::Entity::find())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Todo>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_by_completion(&self, completed: bool) -> RepositoryResult<Vec<Todo>> {
        let query = entity::Entity::find().filter(entity::Column::Completed.eq(completed));
        let models = Self::newest_first(query).all(&self.db).await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, description))]
    async fn create(&self, description: String) -> RepositoryResult<Todo> {
        let todo = NewTodo::new(&description)?;
        let active_model: entity::ActiveModel = todo.into();

        let model = active_model.insert(&self.db).await?;

        tracing::info!(todo_id = model.id, "Created todo");
        Ok(model.into())
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: i32, changes: TodoChanges) -> RepositoryResult<Todo> {
        let model = self.find_model(id).await?;

        let mut todo: Todo = model.clone().into();
        todo.apply_update(&changes)?;
        let updated_at = next_updated_at(todo.updated_at);

        let mut active_model = model.into_active_model();
        active_model.description = Set(todo.description);
        active_model.completed = Set(todo.completed);
        active_model.updated_at = Set(updated_at.into());

        // The row may be deleted between the read above and this write.
        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|err| update_error(id, err))?;

        tracing::info!(todo_id = id, "Updated todo");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> RepositoryResult<()> {
        self.find_model(id).await?;

        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        // Someone else removed the row between the read and the delete.
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        tracing::info!(todo_id = id, "Deleted todo");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self, completed: Option<bool>) -> RepositoryResult<u64> {
        let mut query = entity::Entity::find();

        if let Some(completed) = completed {
            query = query.filter(entity::Column::Completed.eq(completed));
        }

        Ok(query.count(&self.db).await?)
    }

    #[instrument(skip(self))]
    async fn find_page(&self, page: u64, limit: u64) -> RepositoryResult<(Vec<Todo>, u64)> {
        let total = entity::Entity::find().count(&self.db).await?;

        let models = Self::newest_first(entity::Entity::find())
            .offset(page_offset(page, limit))
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    #[instrument(skip(self))]
    async fn search_by_description(&self, term: String) -> RepositoryResult<Vec<Todo>> {
        let pattern = LikeExpr::new(contains_pattern(&term.to_lowercase())).escape('\\');
        let query = entity::Entity::find().filter(
            Expr::expr(Func::lower(Expr::col(entity::Column::Description))).like(pattern),
        );

        let models = Self::newest_first(query).all(&self.db).await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
