use campus_core::config::{env_list, env_or};

/// Inventory service configuration loaded from environment variables.
#[derive(Debug)]
pub struct InventoryConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (shared session store).
    pub redis_url: String,
    /// TCP port to listen on (default 3113). Env var: `INVENTORY_PORT`.
    pub inventory_port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl InventoryConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            inventory_port: env_or("INVENTORY_PORT", 3113),
            cors_allowed_origins: env_list("CORS_ALLOWED_ORIGINS"),
        }
    }
}
