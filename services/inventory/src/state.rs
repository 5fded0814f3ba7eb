use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use campus_session::session::RedisSessionStore;

use crate::infra::db::{DbIssueRequestRepository, DbItemRepository, DbTaxonomyRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn taxonomy_repo(&self) -> DbTaxonomyRepository {
        DbTaxonomyRepository {
            db: self.db.clone(),
        }
    }

    pub fn item_repo(&self) -> DbItemRepository {
        DbItemRepository {
            db: self.db.clone(),
        }
    }

    pub fn request_repo(&self) -> DbIssueRequestRepository {
        DbIssueRequestRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for RedisSessionStore {
    fn from_ref(state: &AppState) -> Self {
        RedisSessionStore {
            pool: state.redis.clone(),
        }
    }
}
