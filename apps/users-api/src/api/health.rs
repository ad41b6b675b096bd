//! Readiness check against the configured store.

use crate::state::{AppState, UsersStore};
use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint that verifies the users table is reachable.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let store: HealthCheckFuture<'_> = match &state.users {
        UsersStore::Memory(_) => Box::pin(async { Ok::<(), String>(()) }),
        UsersStore::DynamoDb(service) => Box::pin(async move {
            service
                .store()
                .check_health()
                .await
                .map_err(|e| format!("DynamoDB check failed: {}", e))
        }),
    };

    run_health_checks(vec![(state.users.backend_name(), store)]).await
}
