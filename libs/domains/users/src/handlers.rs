use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::errors::{
    handlers::method_not_allowed,
    responses::{BadRequestResponse, InternalServerErrorResponse, MethodNotAllowedResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{EmailQuery, UpdateUser, User, UserLookup};
use crate::service::UserService;
use crate::store::ItemStore;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(get_users, create_user, update_user, delete_user),
    components(
        schemas(User, UpdateUser, UserLookup),
        responses(
            BadRequestResponse,
            MethodNotAllowedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router
///
/// All operations share one path and select the user with `?email=`.
pub fn router<S: ItemStore + 'static>(service: UserService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(get_users::<S>)
                .post(create_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>)
                .fallback(method_not_allowed),
        )
        .with_state(shared_service)
}

/// Fetch one user by email, or every user when `email` is omitted
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(EmailQuery),
    responses(
        (status = 200, description = "The user for `email`, or a list of all users", body = UserLookup),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_users<S: ItemStore + 'static>(
    State(service): State<Arc<UserService<S>>>,
    Query(query): Query<EmailQuery>,
) -> UserResult<Json<UserLookup>> {
    let ctx = service.request_context();

    let lookup = match query.email {
        Some(email) => UserLookup::One(service.fetch_user(&ctx, &email).await?),
        None => UserLookup::Many(service.fetch_users(&ctx).await?),
    };

    Ok(Json(lookup))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = User,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<S: ItemStore + 'static>(
    State(service): State<Arc<UserService<S>>>,
    body: Bytes,
) -> UserResult<impl IntoResponse> {
    let ctx = service.request_context();
    let user = service.create_user(&ctx, &body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update the name fields of an existing user
#[utoipa::path(
    put,
    path = "",
    tag = "Users",
    params(EmailQuery),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<S: ItemStore + 'static>(
    State(service): State<Arc<UserService<S>>>,
    Query(query): Query<EmailQuery>,
    body: Bytes,
) -> UserResult<Json<User>> {
    let ctx = service.request_context();
    let email = query.email.unwrap_or_default();
    let user = service.update_user(&ctx, &email, &body).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "",
    tag = "Users",
    params(EmailQuery),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<S: ItemStore + 'static>(
    State(service): State<Arc<UserService<S>>>,
    Query(query): Query<EmailQuery>,
) -> UserResult<StatusCode> {
    let ctx = service.request_context();
    let email = query.email.unwrap_or_default();
    service.delete_user(&ctx, &email).await?;
    Ok(StatusCode::NO_CONTENT)
}
