use sea_orm::Database;
use tracing::info;

use campus_accounts::config::AccountsConfig;
use campus_accounts::infra::google::GoogleTokenVerifier;
use campus_accounts::infra::storage::SupabaseStorage;
use campus_accounts::router::build_router;
use campus_accounts::state::AppState;
use campus_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccountsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::new();
    let storage = SupabaseStorage::new(
        http.clone(),
        &config.storage_url,
        config.storage_key,
        config.storage_bucket,
    )
    .expect("invalid STORAGE_URL");
    let google = GoogleTokenVerifier::new(http, config.google_client_id);

    let state = AppState {
        db,
        redis,
        storage,
        google,
        cookie_domain: config.cookie_domain,
        allowed_email_domain: config.allowed_email_domain,
        signed_url_ttl_secs: config.signed_url_ttl_secs,
        max_upload_bytes: config.max_upload_bytes,
        cors_origins: config.cors_allowed_origins,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.accounts_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
