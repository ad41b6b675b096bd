//! Key-value store capability the user service runs against.
//!
//! Backends only need point reads, full scans, and conditional writes keyed
//! by the `email` attribute. [`InMemoryItemStore`] serves tests and local
//! runs; [`crate::dynamodb::DynamoItemStore`] serves production.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Name of the key attribute every record carries
pub const KEY_ATTRIBUTE: &str = "email";

/// Raw on-store representation of an item
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Precondition evaluated atomically with a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCondition {
    /// Always write
    Unconditional,
    /// Write only if no item has the key yet
    KeyAbsent,
    /// Write only if an item with the key exists
    KeyPresent,
}

impl WriteCondition {
    /// Evaluate the condition given whether the key currently exists.
    pub fn check(self, key: &str, exists: bool) -> StoreResult<()> {
        let holds = match self {
            WriteCondition::Unconditional => true,
            WriteCondition::KeyAbsent => !exists,
            WriteCondition::KeyPresent => exists,
        };

        if holds {
            Ok(())
        } else {
            Err(StoreError::ConditionFailed(key.to_string()))
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("condition check failed for key '{0}'")]
    ConditionFailed(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("record codec error: {0}")]
    Codec(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("store call cancelled")]
    Cancelled,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Extract the key attribute of a record.
pub fn record_key(record: &Record) -> StoreResult<&str> {
    match record.get(KEY_ATTRIBUTE) {
        Some(serde_json::Value::String(key)) if !key.is_empty() => Ok(key),
        Some(_) => Err(StoreError::InvalidRecord(format!(
            "'{}' must be a non-empty string",
            KEY_ATTRIBUTE
        ))),
        None => Err(StoreError::InvalidRecord(format!(
            "missing key attribute '{}'",
            KEY_ATTRIBUTE
        ))),
    }
}

/// Key-value store capability keyed by [`KEY_ATTRIBUTE`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Point lookup; `Ok(None)` when no item has the key
    async fn get_item(&self, key: &str) -> StoreResult<Option<Record>>;

    /// Every item in the collection, in backend-defined order
    async fn scan(&self) -> StoreResult<Vec<Record>>;

    /// Upsert `record` if `condition` holds, else `ConditionFailed`
    async fn put_item(&self, record: Record, condition: WriteCondition) -> StoreResult<()>;

    /// Remove the item with `key` if `condition` holds, else `ConditionFailed`
    async fn delete_item(&self, key: &str, condition: WriteCondition) -> StoreResult<()>;
}

/// In-memory implementation of ItemStore (for development/testing)
///
/// Condition checks and writes happen under a single write lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemStore {
    items: Arc<RwLock<HashMap<String, Record>>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get_item(&self, key: &str) -> StoreResult<Option<Record>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn scan(&self) -> StoreResult<Vec<Record>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn put_item(&self, record: Record, condition: WriteCondition) -> StoreResult<()> {
        let key = record_key(&record)?.to_string();
        let mut items = self.items.write().await;

        condition.check(&key, items.contains_key(&key))?;
        items.insert(key, record);
        Ok(())
    }

    async fn delete_item(&self, key: &str, condition: WriteCondition) -> StoreResult<()> {
        let mut items = self.items.write().await;

        condition.check(key, items.contains_key(key))?;
        items.remove(key);
        Ok(())
    }
}
