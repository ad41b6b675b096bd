use axum_helpers::server::{ShutdownCoordinator, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{DynamoItemStore, InMemoryItemStore, UserService};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreBackend};
use state::{AppState, UsersStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Created before the store so request contexts can observe an aborted drain
    let coordinator = ShutdownCoordinator::new();

    let users = match &config.store {
        StoreBackend::Memory => {
            info!("Using in-memory user store");
            UsersStore::Memory(
                UserService::new(InMemoryItemStore::new()).with_cancellation(coordinator.token()),
            )
        }
        StoreBackend::DynamoDb(dynamo) => {
            info!(
                region = %dynamo.region,
                table = %dynamo.table_name,
                endpoint = ?dynamo.endpoint_url,
                "Using DynamoDB user store"
            );
            let store = DynamoItemStore::from_config(dynamo).await;
            UsersStore::DynamoDb(
                UserService::new(store)
                    .with_store_timeout(dynamo.store_timeout)
                    .with_cancellation(coordinator.token()),
            )
        }
    };

    let state = AppState { config, users };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the users store
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        "Starting users API with graceful shutdown ({:?} timeout)",
        state.config.server.shutdown_timeout
    );

    let backend = state.users.backend_name();
    create_production_app(app, &state.config.server, coordinator, async move {
        info!(backend, "Releasing users store");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
