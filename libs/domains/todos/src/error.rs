use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
use thiserror::Error;
use tonic::{Code, Status};

use crate::validation::ValidationError;

/// Transport-neutral error kinds.
///
/// Every failure leaving the service is exactly one of these, and each maps to
/// one gRPC code and one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Internal,
}

impl ErrorKind {
    pub fn grpc_code(self) -> Code {
        match self {
            ErrorKind::InvalidArgument => Code::InvalidArgument,
            ErrorKind::NotFound => Code::NotFound,
            ErrorKind::AlreadyExists => Code::AlreadyExists,
            ErrorKind::FailedPrecondition => Code::FailedPrecondition,
            ErrorKind::Internal => Code::Internal,
        }
    }

    pub fn http_status(self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Todo with ID {0} not found")]
    NotFound(i32),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    FailedPrecondition(String),

    #[error("{0}")]
    Internal(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            TodoError::NotFound(_) => ErrorKind::NotFound,
            TodoError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            TodoError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            TodoError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Classify a repository failure.
    ///
    /// Raw storage details are logged here and never returned; unexpected
    /// failures surface as `Internal` with the caller's generic message.
    pub fn from_repository(err: RepositoryError, failure_message: &'static str) -> Self {
        match err {
            RepositoryError::NotFound(id) => TodoError::NotFound(id),
            RepositoryError::InvalidField(err) => err.into(),
            RepositoryError::UniqueViolation(detail) => {
                tracing::warn!(detail = %detail, "Unique constraint violated");
                TodoError::AlreadyExists("Resource already exists".to_string())
            }
            RepositoryError::ForeignKeyViolation(detail) => {
                tracing::warn!(detail = %detail, "Foreign key constraint violated");
                TodoError::FailedPrecondition("Operation violates data constraints".to_string())
            }
            RepositoryError::CheckViolation(detail) => {
                tracing::warn!(detail = %detail, "Check constraint violated");
                TodoError::InvalidArgument("Invalid data provided".to_string())
            }
            RepositoryError::Storage(detail) => {
                tracing::error!(error = %detail, "{}", failure_message);
                TodoError::Internal(failure_message.to_string())
            }
        }
    }
}

impl From<ValidationError> for TodoError {
    fn from(err: ValidationError) -> Self {
        TodoError::InvalidArgument(err.to_string())
    }
}

impl From<JsonRejection> for TodoError {
    fn from(rejection: JsonRejection) -> Self {
        TodoError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for TodoError {
    fn from(rejection: QueryRejection) -> Self {
        TodoError::InvalidArgument(rejection.body_text())
    }
}

impl From<PathRejection> for TodoError {
    fn from(rejection: PathRejection) -> Self {
        TodoError::InvalidArgument(rejection.body_text())
    }
}

impl From<TodoError> for Status {
    fn from(err: TodoError) -> Self {
        Status::new(err.kind().grpc_code(), err.to_string())
    }
}

/// Convert TodoError to AppError for standardized error responses
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::InvalidArgument => AppError::BadRequest(message),
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::AlreadyExists => AppError::Conflict(message),
            ErrorKind::FailedPrecondition => AppError::PreconditionFailed(message),
            ErrorKind::Internal => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Failures reported by a [`TodoRepository`](crate::repository::TodoRepository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Todo with ID {0} not found")]
    NotFound(i32),

    #[error(transparent)]
    InvalidField(#[from] ValidationError),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return RepositoryError::UniqueViolation(detail);
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return RepositoryError::ForeignKeyViolation(detail);
            }
            _ => {}
        }

        let message = err.to_string();
        // sea-orm has no dedicated variant for check constraints
        // (Postgres SQLSTATE 23514, SQLite "CHECK constraint failed").
        let lowered = message.to_lowercase();
        if lowered.contains("check constraint") || lowered.contains("23514") {
            RepositoryError::CheckViolation(message)
        } else {
            RepositoryError::Storage(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_names() {
        let names: Vec<String> = ErrorKind::iter().map(|kind| kind.to_string()).collect();
        assert_eq!(
            names,
            [
                "INVALID_ARGUMENT",
                "NOT_FOUND",
                "ALREADY_EXISTS",
                "FAILED_PRECONDITION",
                "INTERNAL"
            ]
        );
    }

    #[test]
    fn test_kind_mapping_table() {
        let expected = [
            (ErrorKind::InvalidArgument, Code::InvalidArgument, StatusCode::BAD_REQUEST),
            (ErrorKind::NotFound, Code::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::AlreadyExists, Code::AlreadyExists, StatusCode::CONFLICT),
            (
                ErrorKind::FailedPrecondition,
                Code::FailedPrecondition,
                StatusCode::PRECONDITION_FAILED,
            ),
            (ErrorKind::Internal, Code::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (kind, code, status) in expected {
            assert_eq!(kind.grpc_code(), code);
            assert_eq!(kind.http_status(), status);
        }
    }

    #[test]
    fn test_not_found_message_names_id() {
        let status: Status = TodoError::NotFound(999999).into();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Todo with ID 999999 not found");
    }

    #[test]
    fn test_validation_error_becomes_invalid_argument() {
        let err: TodoError = ValidationError::MissingFields.into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "At least one field (description or completed) must be provided for update"
        );
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err = TodoError::from_repository(
            RepositoryError::Storage("connection refused at 10.0.0.3:5432".to_string()),
            "Failed to create todo",
        );
        assert_eq!(err, TodoError::Internal("Failed to create todo".to_string()));
    }

    #[test]
    fn test_constraint_violations_are_classified() {
        let err = TodoError::from_repository(
            RepositoryError::UniqueViolation("todos_pkey".to_string()),
            "Failed to create todo",
        );
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = TodoError::from_repository(
            RepositoryError::ForeignKeyViolation("fk".to_string()),
            "Failed to create todo",
        );
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);

        let err = TodoError::from_repository(
            RepositoryError::CheckViolation("chk".to_string()),
            "Failed to create todo",
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_db_error_falls_back_to_storage() {
        let err: RepositoryError = DbErr::Custom("socket closed".to_string()).into();
        assert!(matches!(err, RepositoryError::Storage(_)));
    }

    #[test]
    fn test_http_response_status() {
        let response = TodoError::FailedPrecondition("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

        let response = TodoError::NotFound(1).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
