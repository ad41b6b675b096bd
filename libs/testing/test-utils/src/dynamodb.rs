//! DynamoDB test infrastructure
//!
//! Provides a `TestDynamo` helper that runs DynamoDB Local in a container.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::dynamodb_local::DynamoDb;

const DYNAMODB_PORT: u16 = 8000;

/// Test DynamoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestDynamo;
///
/// # async fn example() {
/// let dynamo = TestDynamo::new().await;
/// let table = dynamo.create_table("users").await;
/// let client = dynamo.client();
/// # }
/// ```
pub struct TestDynamo {
    #[allow(dead_code)]
    container: ContainerAsync<DynamoDb>,
    client: Client,
}

impl TestDynamo {
    /// Start DynamoDB Local and build a client with static credentials.
    pub async fn new() -> Self {
        let container = DynamoDb::default()
            .start()
            .await
            .expect("Failed to start DynamoDB Local container");

        let host_port = container
            .get_host_port_ipv4(DYNAMODB_PORT)
            .await
            .expect("Failed to get DynamoDB Local port");

        let endpoint_url = format!("http://127.0.0.1:{}", host_port);

        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(&endpoint_url)
            .credentials_provider(Credentials::new("test", "test", None, None, "test-utils"))
            .build();

        tracing::info!(port = host_port, "Test DynamoDB Local ready");

        Self {
            container,
            client: Client::from_conf(config),
        }
    }

    /// Get a cloned client (useful for passing to stores)
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Create an on-demand table keyed by the string attribute `email`.
    ///
    /// Returns the table name for chaining.
    pub async fn create_table(&self, table_name: &str) -> String {
        let key_definition = AttributeDefinition::builder()
            .attribute_name("email")
            .attribute_type(ScalarAttributeType::S)
            .build()
            .expect("Invalid attribute definition");

        let key_schema = KeySchemaElement::builder()
            .attribute_name("email")
            .key_type(KeyType::Hash)
            .build()
            .expect("Invalid key schema");

        self.client
            .create_table()
            .table_name(table_name)
            .attribute_definitions(key_definition)
            .key_schema(key_schema)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .expect("Failed to create test table");

        table_name.to_string()
    }
}
