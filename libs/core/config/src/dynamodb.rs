use crate::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or, env_required};
use std::time::Duration;

const DEFAULT_TABLE_NAME: &str = "users";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// DynamoDB table configuration
#[derive(Clone, Debug)]
pub struct DynamoConfig {
    /// AWS region hosting the table
    pub region: String,
    pub table_name: String,
    /// Endpoint override, e.g. `http://localhost:8000` for DynamoDB Local
    pub endpoint_url: Option<String>,
    /// Deadline applied to every individual store call
    pub store_timeout: Duration,
}

impl FromEnv for DynamoConfig {
    /// - AWS_REGION: required
    /// - USERS_TABLE_NAME: defaults to `users`
    /// - DYNAMODB_ENDPOINT_URL: optional
    /// - STORE_TIMEOUT_MS: defaults to 5000
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms = env_parse_or("STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;

        Ok(Self {
            region: env_required("AWS_REGION")?,
            table_name: env_or_default("USERS_TABLE_NAME", DEFAULT_TABLE_NAME),
            endpoint_url: env_optional("DYNAMODB_ENDPOINT_URL"),
            store_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
