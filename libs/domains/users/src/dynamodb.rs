//! DynamoDB implementation of ItemStore

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use core_config::dynamodb::DynamoConfig;
use serde_json::{Number, Value};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::store::{
    ItemStore, KEY_ATTRIBUTE, Record, StoreError, StoreResult, WriteCondition, record_key,
};

type Item = HashMap<String, AttributeValue>;

/// Expression attribute name standing in for the key attribute
const KEY_PLACEHOLDER: &str = "#key";

/// DynamoDB-backed ItemStore over a single table keyed by `email`.
#[derive(Clone, Debug)]
pub struct DynamoItemStore {
    client: Client,
    table_name: String,
}

impl DynamoItemStore {
    /// Create a store over an existing client
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Create from configuration using the default AWS credential chain:
    /// - environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
    /// - web identity token
    /// - IAM instance profile
    /// - shared credentials file
    pub async fn from_config(config: &DynamoConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Verify the table is reachable; used by the readiness endpoint.
    pub async fn check_health(&self) -> StoreResult<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))
    }

    fn key(key: &str) -> AttributeValue {
        AttributeValue::S(key.to_string())
    }

    fn condition_expression(condition: WriteCondition) -> Option<String> {
        match condition {
            WriteCondition::Unconditional => None,
            WriteCondition::KeyAbsent => Some(format!("attribute_not_exists({})", KEY_PLACEHOLDER)),
            WriteCondition::KeyPresent => Some(format!("attribute_exists({})", KEY_PLACEHOLDER)),
        }
    }

    fn condition_names(condition: WriteCondition) -> Option<HashMap<String, String>> {
        Self::condition_expression(condition)
            .map(|_| HashMap::from([(KEY_PLACEHOLDER.to_string(), KEY_ATTRIBUTE.to_string())]))
    }
}

/// Convert a JSON value into a DynamoDB attribute.
pub fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => AttributeValue::L(items.into_iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(record_to_item(map)),
    }
}

/// Convert a DynamoDB attribute into a JSON value.
///
/// Sets and binary attributes have no JSON counterpart and are rejected.
pub fn attribute_to_json(attribute: AttributeValue) -> StoreResult<Value> {
    match attribute {
        AttributeValue::S(s) => Ok(Value::String(s)),
        AttributeValue::N(n) => serde_json::from_str::<Number>(&n)
            .map(Value::Number)
            .map_err(|e| StoreError::Codec(format!("invalid number '{}': {}", n, e))),
        AttributeValue::Bool(b) => Ok(Value::Bool(b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(items) => items
            .into_iter()
            .map(attribute_to_json)
            .collect::<StoreResult<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_to_record(map).map(Value::Object),
        other => Err(StoreError::Codec(format!(
            "unsupported attribute type: {:?}",
            other
        ))),
    }
}

pub fn record_to_item(record: Record) -> Item {
    record
        .into_iter()
        .map(|(name, value)| (name, json_to_attribute(value)))
        .collect()
}

pub fn item_to_record(item: Item) -> StoreResult<Record> {
    item.into_iter()
        .map(|(name, attribute)| attribute_to_json(attribute).map(|value| (name, value)))
        .collect()
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get_item(&self, key: &str) -> StoreResult<Option<Record>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(key))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;

        output.item.map(item_to_record).transpose()
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn scan(&self) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;

            for item in output.items.unwrap_or_default() {
                records.push(item_to_record(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => {
                    debug!(fetched = records.len(), "Scan page exhausted, continuing");
                    start_key = Some(key);
                }
                _ => break,
            }
        }

        Ok(records)
    }

    #[instrument(skip(self, record), fields(table = %self.table_name))]
    async fn put_item(&self, record: Record, condition: WriteCondition) -> StoreResult<()> {
        let key = record_key(&record)?.to_string();

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .set_condition_expression(Self::condition_expression(condition))
            .set_expression_attribute_names(Self::condition_names(condition))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::ConditionFailed(key))
            }
            Err(e) => Err(StoreError::Backend(DisplayErrorContext(&e).to_string())),
        }
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn delete_item(&self, key: &str, condition: WriteCondition) -> StoreResult<()> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(key))
            .set_condition_expression(Self::condition_expression(condition))
            .set_expression_attribute_names(Self::condition_names(condition))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::ConditionFailed(key.to_string()))
            }
            Err(e) => Err(StoreError::Backend(DisplayErrorContext(&e).to_string())),
        }
    }
}
