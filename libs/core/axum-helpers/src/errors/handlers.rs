use axum::response::Response;

use super::{ErrorCode, error_response};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    let code = ErrorCode::RouteNotFound;
    error_response(code, code.default_message().to_string())
}

/// Fallback for a known route called with the wrong method.
pub async fn method_not_allowed() -> Response {
    let code = ErrorCode::MethodNotAllowed;
    error_response(code, code.default_message().to_string())
}
