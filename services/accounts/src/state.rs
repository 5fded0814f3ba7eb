use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use campus_session::session::RedisSessionStore;

use crate::infra::cache::RedisLookupCache;
use crate::infra::db::{DbFileRepository, DbUserRepository};
use crate::infra::google::GoogleTokenVerifier;
use crate::infra::storage::SupabaseStorage;
use crate::usecase::file::SignedUrls;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub storage: SupabaseStorage,
    pub google: GoogleTokenVerifier,
    pub cookie_domain: String,
    pub allowed_email_domain: String,
    pub signed_url_ttl_secs: u64,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn file_repo(&self) -> DbFileRepository {
        DbFileRepository {
            db: self.db.clone(),
        }
    }

    pub fn sessions(&self) -> RedisSessionStore {
        RedisSessionStore {
            pool: self.redis.clone(),
        }
    }

    pub fn lookup_cache(&self) -> RedisLookupCache {
        RedisLookupCache {
            pool: self.redis.clone(),
        }
    }

    pub fn signed_urls(&self) -> SignedUrls<SupabaseStorage, RedisLookupCache> {
        SignedUrls {
            storage: self.storage.clone(),
            cache: self.lookup_cache(),
            ttl_secs: self.signed_url_ttl_secs,
        }
    }
}

impl FromRef<AppState> for RedisSessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions()
    }
}
