//! Users Domain
//!
//! User management over a key-value store keyed by email.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, one path selected by ?email=
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Decoding, validation, error classification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Store    │  ← ItemStore trait (in-memory + DynamoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, UpdateUser, query params
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, store::InMemoryItemStore, service::UserService};
//!
//! // Create store and service
//! let store = InMemoryItemStore::new();
//! let service = UserService::new(store);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod context;
pub mod dynamodb;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;
pub mod validators;

// Re-export commonly used types
pub use context::RequestContext;
pub use dynamodb::DynamoItemStore;
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{EmailQuery, UpdateUser, User, UserLookup};
pub use service::UserService;
pub use store::{InMemoryItemStore, ItemStore, Record, StoreError, StoreResult, WriteCondition};
pub use validators::is_email_valid;
