//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the todo service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Todo management API with gRPC and REST support",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/todos", api = domain_todos::TodosApiDoc)
    ),
    tags(
        (name = "todos", description = "Todo item operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_nested_under_api() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/todos"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/todos/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/todos/stats"));
    }
}
