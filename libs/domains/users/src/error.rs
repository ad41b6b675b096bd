use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde_json::json;
use thiserror::Error;

/// Failure kinds of the user service.
///
/// Each variant identifies one failure site and carries context for logs and
/// the response message.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid user data: {0}")]
    InvalidUserData(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("user '{0}' already exists")]
    AlreadyExists(String),

    #[error("user '{0}' does not exist")]
    DoesNotExist(String),

    #[error("failed to fetch record: {0}")]
    FetchFailed(String),

    #[error("failed to unmarshal record: {0}")]
    UnmarshalFailed(String),

    #[error("could not marshal item: {0}")]
    MarshalFailed(String),

    #[error("could not put item: {0}")]
    PutFailed(String),

    #[error("could not delete item: {0}")]
    DeleteFailed(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Stable machine-readable identifier of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::InvalidUserData(_) => "INVALID_USER_DATA",
            UserError::InvalidEmail(_) => "INVALID_EMAIL",
            UserError::AlreadyExists(_) => "USER_ALREADY_EXISTS",
            UserError::DoesNotExist(_) => "USER_DOES_NOT_EXIST",
            UserError::FetchFailed(_) => "FAILED_TO_FETCH_RECORD",
            UserError::UnmarshalFailed(_) => "FAILED_TO_UNMARSHAL_RECORD",
            UserError::MarshalFailed(_) => "COULD_NOT_MARSHAL_ITEM",
            UserError::PutFailed(_) => "COULD_NOT_PUT_ITEM",
            UserError::DeleteFailed(_) => "COULD_NOT_DELETE_ITEM",
        }
    }

    /// Whether the failure was caused by the request rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UserError::InvalidUserData(_)
                | UserError::InvalidEmail(_)
                | UserError::AlreadyExists(_)
                | UserError::DoesNotExist(_)
        )
    }
}

/// Validation and business-rule failures are `400`, store failures `500`.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let details = json!({ "kind": err.kind() });
        let message = err.to_string();

        let app_error = match &err {
            _ if err.is_client_error() => AppError::BadRequest(message),
            UserError::UnmarshalFailed(_) => AppError::StoreDecode(message),
            _ => AppError::Store(message),
        };

        app_error.with_details(details)
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        for err in [
            UserError::InvalidUserData("x".into()),
            UserError::InvalidEmail("x".into()),
            UserError::AlreadyExists("a@b.com".into()),
            UserError::DoesNotExist("a@b.com".into()),
        ] {
            assert!(err.is_client_error());
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_store_errors_map_to_internal_error() {
        for err in [
            UserError::FetchFailed("x".into()),
            UserError::UnmarshalFailed("x".into()),
            UserError::MarshalFailed("x".into()),
            UserError::PutFailed("x".into()),
            UserError::DeleteFailed("x".into()),
        ] {
            assert!(!err.is_client_error());
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_messages_name_the_failure() {
        assert_eq!(
            UserError::AlreadyExists("a@b.com".into()).to_string(),
            "user 'a@b.com' already exists"
        );
        assert_eq!(UserError::DeleteFailed("boom".into()).kind(), "COULD_NOT_DELETE_ITEM");
    }
}
