use axum::response::{IntoResponse, Response};

use super::AppError;

/// Fallback for routes that do not exist.
pub async fn not_found() -> Response {
    AppError::NotFound("The requested resource was not found".to_string()).into_response()
}

/// Fallback for methods a route does not support.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed("method not allowed".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_fallback_statuses() {
        assert_eq!(not_found().await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            method_not_allowed().await.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
