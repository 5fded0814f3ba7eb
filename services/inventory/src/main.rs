use sea_orm::Database;
use tracing::info;

use campus_core::tracing::init_tracing;
use campus_inventory::config::InventoryConfig;
use campus_inventory::router::build_router;
use campus_inventory::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = InventoryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        cors_origins: config.cors_allowed_origins,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.inventory_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("inventory service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
