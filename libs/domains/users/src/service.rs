//! User Service - Business logic layer

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::context::RequestContext;
use crate::error::{UserError, UserResult};
use crate::models::{UpdateUser, User};
use crate::store::{ItemStore, Record, StoreError, WriteCondition};
use crate::validators::is_email_valid;

/// User service providing the five user operations
///
/// Decodes and validates payloads, then drives the store through a
/// [`RequestContext`]. Every store failure is classified where it happens.
pub struct UserService<S: ItemStore> {
    store: Arc<S>,
    store_timeout: Option<Duration>,
    shutdown: CancellationToken,
}

impl<S: ItemStore> UserService<S> {
    /// Create a new UserService over the given store
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            store_timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Bound each request's store calls by `timeout`
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Abort in-flight store calls once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fresh context for one request, tied to the service's shutdown token.
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new().with_cancellation(self.shutdown.child_token());
        match self.store_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// Fetch a single user by email
    #[instrument(skip(self, ctx))]
    pub async fn fetch_user(&self, ctx: &RequestContext, email: &str) -> UserResult<User> {
        if email.is_empty() {
            return Err(UserError::InvalidEmail("email is required".to_string()));
        }

        let record = ctx
            .run(self.store.get_item(email))
            .await
            .map_err(read_error)?
            .ok_or_else(|| UserError::DoesNotExist(email.to_string()))?;

        decode_user(record)
    }

    /// Fetch every user; one undecodable record fails the whole call
    #[instrument(skip(self, ctx))]
    pub async fn fetch_users(&self, ctx: &RequestContext) -> UserResult<Vec<User>> {
        let records = ctx.run(self.store.scan()).await.map_err(read_error)?;
        records.into_iter().map(decode_user).collect()
    }

    /// Create a user from a raw JSON payload
    #[instrument(skip(self, ctx, body))]
    pub async fn create_user(&self, ctx: &RequestContext, body: &[u8]) -> UserResult<User> {
        let user: User = serde_json::from_slice(body)
            .map_err(|e| UserError::InvalidUserData(e.to_string()))?;

        if !is_email_valid(&user.email) {
            return Err(UserError::InvalidEmail(user.email));
        }

        // Early answer for the common case; the conditional put decides.
        match self.fetch_user(ctx, &user.email).await {
            Ok(existing) if !existing.email.is_empty() => {
                return Err(UserError::AlreadyExists(user.email));
            }
            Ok(_) | Err(UserError::DoesNotExist(_)) => {}
            Err(e) => warn!(email = %user.email, error = %e, "Existence lookup failed"),
        }

        let record = encode_user(&user)?;
        ctx.run(self.store.put_item(record, WriteCondition::KeyAbsent))
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => UserError::AlreadyExists(user.email.clone()),
                other => UserError::PutFailed(other.to_string()),
            })?;

        info!(email = %user.email, "User created");
        Ok(user)
    }

    /// Overwrite the name fields of an existing user
    #[instrument(skip(self, ctx, body))]
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        body: &[u8],
    ) -> UserResult<User> {
        if email.is_empty() {
            return Err(UserError::InvalidEmail("email is required".to_string()));
        }

        let update: UpdateUser = serde_json::from_slice(body)
            .map_err(|e| UserError::InvalidUserData(e.to_string()))?;

        if let Some(body_email) = &update.email {
            if !is_email_valid(body_email) {
                return Err(UserError::InvalidEmail(body_email.clone()));
            }
            if body_email != email {
                return Err(UserError::InvalidUserData(format!(
                    "email cannot change from '{}' to '{}'",
                    email, body_email
                )));
            }
        }

        let mut user = self.fetch_user(ctx, email).await?;
        user.apply_update(update);

        let record = encode_user(&user)?;
        ctx.run(self.store.put_item(record, WriteCondition::KeyPresent))
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => UserError::DoesNotExist(email.to_string()),
                other => UserError::PutFailed(other.to_string()),
            })?;

        info!(email = %email, "User updated");
        Ok(user)
    }

    /// Delete an existing user
    #[instrument(skip(self, ctx))]
    pub async fn delete_user(&self, ctx: &RequestContext, email: &str) -> UserResult<()> {
        if email.is_empty() {
            return Err(UserError::InvalidEmail("email is required".to_string()));
        }

        ctx.run(self.store.delete_item(email, WriteCondition::KeyPresent))
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => UserError::DoesNotExist(email.to_string()),
                other => UserError::DeleteFailed(other.to_string()),
            })?;

        info!(email = %email, "User deleted");
        Ok(())
    }
}

impl<S: ItemStore> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            store_timeout: self.store_timeout,
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Classify a failed read: undecodable attributes are an unmarshal failure,
/// everything else a fetch failure.
fn read_error(err: StoreError) -> UserError {
    match err {
        StoreError::Codec(msg) | StoreError::InvalidRecord(msg) => UserError::UnmarshalFailed(msg),
        other => UserError::FetchFailed(other.to_string()),
    }
}

fn decode_user(record: Record) -> UserResult<User> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| UserError::UnmarshalFailed(e.to_string()))
}

fn encode_user(user: &User) -> UserResult<Record> {
    match serde_json::to_value(user) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(UserError::MarshalFailed(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(UserError::MarshalFailed(e.to_string())),
    }
}
