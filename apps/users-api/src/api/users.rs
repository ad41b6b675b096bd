use axum::Router;
use domain_users::handlers;

use crate::state::{AppState, UsersStore};

pub fn router(state: &AppState) -> Router {
    match &state.users {
        UsersStore::Memory(service) => handlers::router(service.clone()),
        UsersStore::DynamoDb(service) => handlers::router(service.clone()),
    }
}
