//! Field and request validation shared by every entry point.
//!
//! Inputs arrive as raw JSON values so that the REST body, the REST path and
//! the gRPC message all run through the exact same rules. `None` means the
//! field was absent, `Some(Value::Null)` means it was sent as an explicit null.

use serde_json::Value;
use thiserror::Error;

use crate::models::{
    CreateTodoRequest, DeleteTodoRequest, PageParams, TodoChanges, TodoUpdate, UpdateTodoRequest,
};

/// Maximum description length, counted in characters after trimming.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be a positive integer")]
    OutOfRange { field: &'static str },

    #[error("At least one field (description or completed) must be provided for update")]
    MissingFields,

    #[error("{0}")]
    Constraint(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trim a description and check its length.
///
/// This is the single place the description rules live; the entity, the
/// repository and the request validators all call it.
pub fn normalize_description(raw: &str, field: &'static str) -> ValidationResult<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_DESCRIPTION_LENGTH,
        });
    }

    Ok(trimmed.to_owned())
}

pub fn validate_description(value: Option<&Value>, field: &'static str) -> ValidationResult<String> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::Required { field }),
        Some(Value::String(raw)) => normalize_description(raw, field),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

/// Validate a todo id.
///
/// Numeric strings are accepted so a URL path segment can be passed through
/// unchanged. They follow `i64::from_str` after trimming: surrounding
/// whitespace and a leading `+` are allowed, so `" 7 "` and `"+5"` are ids 7
/// and 5.
pub fn validate_id(value: Option<&Value>, field: &'static str) -> ValidationResult<i32> {
    let wrong_type = ValidationError::WrongType {
        field,
        expected: "an integer",
    };

    let number = match value {
        None | Some(Value::Null) => return Err(ValidationError::Required { field }),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(number) => number,
            // Integers beyond i64 are still integers, just far out of range.
            None if number.is_u64() => return Err(ValidationError::OutOfRange { field }),
            None => return Err(wrong_type),
        },
        Some(Value::String(raw)) => raw.trim().parse::<i64>().map_err(|_| wrong_type)?,
        Some(_) => return Err(wrong_type),
    };

    if number <= 0 {
        return Err(ValidationError::OutOfRange { field });
    }

    i32::try_from(number).map_err(|_| ValidationError::OutOfRange { field })
}

pub fn validate_boolean(value: Option<&Value>, field: &'static str) -> ValidationResult<bool> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::Required { field }),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

pub fn validate_create_request(request: &CreateTodoRequest) -> ValidationResult<String> {
    validate_description(request.description.as_ref(), "description")
}

/// Validate a partial update.
///
/// The empty-update check runs before the id check, so a request carrying no
/// changes is rejected the same way whatever id it names.
pub fn validate_update_request(request: &UpdateTodoRequest) -> ValidationResult<TodoUpdate> {
    if request.description.is_none() && request.completed.is_none() {
        return Err(ValidationError::MissingFields);
    }

    let id = validate_id(request.id.as_ref(), "id")?;

    let description = request
        .description
        .as_ref()
        .map(|value| validate_description(Some(value), "description"))
        .transpose()?;

    let completed = request
        .completed
        .as_ref()
        .map(|value| validate_boolean(Some(value), "completed"))
        .transpose()?;

    Ok(TodoUpdate {
        id,
        changes: TodoChanges {
            description,
            completed,
        },
    })
}

pub fn validate_delete_request(request: &DeleteTodoRequest) -> ValidationResult<i32> {
    validate_id(request.id.as_ref(), "id")
}

pub fn validate_search_term(value: Option<&Value>) -> ValidationResult<String> {
    validate_description(value, "q")
}

/// Resolve page parameters, applying defaults for the missing ones.
pub fn validate_page(params: &PageParams) -> ValidationResult<(u64, u64)> {
    validator::Validate::validate(params)?;

    Ok((
        params.page.unwrap_or(DEFAULT_PAGE),
        params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    ))
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());

        ValidationError::Constraint(message)
    }
}
