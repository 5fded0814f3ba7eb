use campus_core::config::{env_list, env_or};

/// Accounts service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (sessions and lookup cache).
    pub redis_url: String,
    /// Cookie domain attribute for the session cookie.
    pub cookie_domain: String,
    /// TCP port to listen on (default 3112). Env var: `ACCOUNTS_PORT`.
    pub accounts_port: u16,
    /// Domain self-service emails must belong to (default "lnmiit.ac.in").
    pub allowed_email_domain: String,
    /// OAuth client id Google ID tokens must be issued for.
    pub google_client_id: String,
    /// Storage service base URL (e.g. "https://xyz.supabase.co").
    pub storage_url: String,
    /// Service key for the storage API.
    pub storage_key: String,
    /// Private bucket holding uploads.
    pub storage_bucket: String,
    /// Lifetime of signed URLs in seconds (default 3600).
    pub signed_url_ttl_secs: u64,
    /// Request body limit for uploads and imports (default 25 MiB).
    pub max_upload_bytes: usize,
    /// Browser origins allowed to send credentialed requests.
    pub cors_allowed_origins: Vec<String>,
}

impl AccountsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            accounts_port: env_or("ACCOUNTS_PORT", 3112),
            allowed_email_domain: env_or("ALLOWED_EMAIL_DOMAIN", "lnmiit.ac.in".to_owned()),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID"),
            storage_url: std::env::var("STORAGE_URL").expect("STORAGE_URL"),
            storage_key: std::env::var("STORAGE_KEY").expect("STORAGE_KEY"),
            storage_bucket: std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET"),
            signed_url_ttl_secs: env_or("SIGNED_URL_TTL_SECS", 3600),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 25 * 1024 * 1024),
            cors_allowed_origins: env_list("CORS_ALLOWED_ORIGINS"),
        }
    }
}
