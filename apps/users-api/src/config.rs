use core_config::dynamodb::DynamoConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Which ItemStore backs the users service
#[derive(Clone, Debug)]
pub enum StoreBackend {
    /// Process-local map, lost on restart
    Memory,
    DynamoDb(DynamoConfig),
}

impl FromEnv for StoreBackend {
    /// - USERS_STORE_BACKEND: `dynamodb` (default) or `memory`
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_or_default("USERS_STORE_BACKEND", "dynamodb");

        match backend.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "dynamodb" => Ok(StoreBackend::DynamoDb(DynamoConfig::from_env()?)),
            other => Err(ConfigError::ParseError {
                key: "USERS_STORE_BACKEND".to_string(),
                details: format!("expected 'dynamodb' or 'memory', got '{}'", other),
            }),
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub store: StoreBackend,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let store = StoreBackend::from_env()?; // AWS_REGION required for dynamodb

        Ok(Self {
            app: app_info!(),
            server,
            store,
            environment,
        })
    }
}
