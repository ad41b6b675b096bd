use domain_users::{DynamoItemStore, InMemoryItemStore, UserService};

use crate::config::Config;

/// User service over whichever backend was configured
#[derive(Clone)]
pub enum UsersStore {
    Memory(UserService<InMemoryItemStore>),
    DynamoDb(UserService<DynamoItemStore>),
}

impl UsersStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            UsersStore::Memory(_) => "memory",
            UsersStore::DynamoDb(_) => "dynamodb",
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UsersStore,
}
