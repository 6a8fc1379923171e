use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::validation::{ValidationResult, normalize_description};

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Apply a partial update in place.
    ///
    /// A supplied description goes through the same trimming and length rules
    /// as on creation. `updated_at` is left alone; whoever persists the change
    /// owns the clock.
    pub fn apply_update(&mut self, changes: &TodoChanges) -> ValidationResult<()> {
        if let Some(description) = &changes.description {
            self.description = normalize_description(description, "description")?;
        }

        if let Some(completed) = changes.completed {
            self.completed = completed;
        }

        Ok(())
    }
}

/// A todo that passed validation but has not been persisted yet.
///
/// The store assigns the id and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    description: String,
}

impl NewTodo {
    pub fn new(description: &str) -> ValidationResult<Self> {
        Ok(Self {
            description: normalize_description(description, "description")?,
        })
    }

    pub fn completed(&self) -> bool {
        false
    }

    pub fn into_description(self) -> String {
        self.description
    }
}

/// Validated changes for a partial update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Output of update validation: the target id and what to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub id: i32,
    pub changes: TodoChanges,
}

/// Keep explicit nulls as `Some(Value::Null)` so "sent as null" and
/// "not sent" stay distinguishable.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Raw create request, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, example = "Buy groceries")]
    pub description: Option<Value>,
}

/// Raw update request, before validation.
///
/// Over HTTP the id comes from the path and the rest from [`UpdateTodoBody`].
#[derive(Debug, Clone, Default)]
pub struct UpdateTodoRequest {
    pub id: Option<Value>,
    pub description: Option<Value>,
    pub completed: Option<Value>,
}

/// JSON body of `PUT /todos/{id}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodoBody {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "Buy milk")]
    pub description: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<bool>, example = true)]
    pub completed: Option<Value>,
}

impl UpdateTodoBody {
    pub fn with_id(self, id: Value) -> UpdateTodoRequest {
        UpdateTodoRequest {
            id: Some(id),
            description: self.description,
            completed: self.completed,
        }
    }
}

/// Raw delete request, before validation.
#[derive(Debug, Clone, Default)]
pub struct DeleteTodoRequest {
    pub id: Option<Value>,
}

/// Page selection for paginated listing
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number (default 1)
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: Option<u64>,

    /// Items per page (default 10, max 100)
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u64>,
}

/// Query parameters accepted by `GET /todos`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Only return todos with this completion state (`true` or `false`)
    pub completed: Option<String>,
}

/// Query parameters accepted by `GET /todos/search`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring to look for in descriptions
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// Counts of todos by completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub incomplete: u64,
}

/// One page of todos, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// Current time at the precision the SQL stores keep.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for a mutation of a record last touched at `previous`.
///
/// Always strictly later than `previous`, even when the clock has not moved.
pub fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
