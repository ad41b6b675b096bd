//! Handler tests for Users domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Method and `?email=` dispatch on the single users path
//! - HTTP status codes
//! - Error envelopes carrying the failure kind
//!
//! They run against the in-memory store, so no container is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    handlers::router(UserService::new(InMemoryItemStore::new()))
}

fn post_user(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_create_user_handler_returns_201() {
    let builder = TestDataBuilder::from_test_name("handler_create_201");
    let email = builder.email("ann");

    let response = app()
        .oneshot(post_user(json!({
            "email": email,
            "firstName": "Ann",
            "lastName": "Lee"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let user: User = json_body(response.into_body()).await;
    assert_eq!(user, User::new(email, "Ann", "Lee"));
}

#[tokio::test]
async fn test_create_user_handler_invalid_email_is_400() {
    let response = app()
        .oneshot(post_user(json!({ "email": "ab.com", "firstName": "Ann" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "BAD_REQUEST");
    assert_eq!(body["details"]["kind"], "INVALID_EMAIL");
}

#[tokio::test]
async fn test_create_user_handler_malformed_body_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::from("{\"email\":"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["kind"], "INVALID_USER_DATA");
}

#[tokio::test]
async fn test_create_duplicate_user_is_400_already_exists() {
    let app = app();
    let payload = json!({ "email": "a@b.com", "firstName": "Ann", "lastName": "Lee" });

    let first = app.clone().oneshot(post_user(payload)).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_user(json!({ "email": "a@b.com", "firstName": "X", "lastName": "Y" })))
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(second.into_body()).await;
    assert_eq!(body["details"]["kind"], "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_get_with_email_fetches_one_user() {
    let app = app();
    app.clone()
        .oneshot(post_user(json!({ "email": "a@b.com", "firstName": "Ann", "lastName": "Lee" })))
        .await
        .unwrap();

    let response = app.oneshot(empty("GET", "/?email=a@b.com")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user: User = json_body(response.into_body()).await;
    assert_eq!(user, User::new("a@b.com", "Ann", "Lee"));
}

#[tokio::test]
async fn test_get_unknown_user_is_400_does_not_exist() {
    let response = app()
        .oneshot(empty("GET", "/?email=nobody@b.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["kind"], "USER_DOES_NOT_EXIST");
}

#[tokio::test]
async fn test_get_without_email_lists_users() {
    let app = app();

    let response = app.clone().oneshot(empty("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let users: Vec<User> = json_body(response.into_body()).await;
    assert!(users.is_empty());

    for email in ["a@b.com", "c@d.com"] {
        app.clone()
            .oneshot(post_user(json!({ "email": email })))
            .await
            .unwrap();
    }

    let response = app.oneshot(empty("GET", "/")).await.unwrap();
    let mut users: Vec<User> = json_body(response.into_body()).await;
    users.sort_by(|a, b| a.email.cmp(&b.email));
    assert_eq!(
        users.iter().map(|u| u.email.as_str()).collect::<Vec<_>>(),
        vec!["a@b.com", "c@d.com"]
    );
}

#[tokio::test]
async fn test_put_updates_names() {
    let app = app();
    app.clone()
        .oneshot(post_user(json!({ "email": "a@b.com", "firstName": "Ann", "lastName": "Lee" })))
        .await
        .unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri("/?email=a@b.com")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "lastName": "Kim" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user: User = json_body(response.into_body()).await;
    assert_eq!(user, User::new("a@b.com", "Ann", "Kim"));
}

#[tokio::test]
async fn test_put_without_email_is_400() {
    let request = Request::builder()
        .method("PUT")
        .uri("/")
        .body(Body::from(json!({ "firstName": "Ann" }).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["kind"], "INVALID_EMAIL");
}

#[tokio::test]
async fn test_delete_returns_204_then_400() {
    let app = app();
    app.clone()
        .oneshot(post_user(json!({ "email": "a@b.com" })))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty("DELETE", "/?email=a@b.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(empty("DELETE", "/?email=a@b.com")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["kind"], "USER_DOES_NOT_EXIST");
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let response = app().oneshot(empty("PATCH", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "METHOD_NOT_ALLOWED");
}

#[test]
fn test_openapi_get_documents_single_and_list_bodies() {
    use utoipa::OpenApi;

    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

    let variants = doc["components"]["schemas"]["UserLookup"]["oneOf"]
        .as_array()
        .expect("UserLookup should be a oneOf schema");
    assert_eq!(variants.len(), 2);

    let paths = doc["paths"].as_object().expect("paths object");
    let get = paths
        .values()
        .find_map(|item| item.get("get"))
        .expect("GET operation");
    let schema = &get["responses"]["200"]["content"]["application/json"]["schema"];
    assert_eq!(schema["$ref"], "#/components/schemas/UserLookup");
}
