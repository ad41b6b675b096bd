//! Reusable OpenAPI response types for API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - invalid payload or business rule violation",
    content_type = "application/json",
    example = json!({
        "code": 1012,
        "error": "BAD_REQUEST",
        "message": "invalid email: not-an-email",
        "details": { "kind": "INVALID_EMAIL" }
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Method Not Allowed",
    content_type = "application/json",
    example = json!({
        "code": 1013,
        "error": "METHOD_NOT_ALLOWED",
        "message": "method not allowed"
    })
)]
pub struct MethodNotAllowedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error - storage failure",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "STORE_ERROR",
        "message": "failed to fetch record: store call timed out",
        "details": { "kind": "FAILED_TO_FETCH_RECORD" }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
