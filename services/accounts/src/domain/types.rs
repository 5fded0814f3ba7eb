use std::pin::Pin;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::user::UserRole;

/// How long a full-detail lookup stays cached.
pub const USER_DETAIL_TTL_SECS: u64 = 60;

/// Signed URLs leave the cache this long before they expire upstream.
pub const SIGNED_URL_CACHE_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub profile_picture: Option<String>,
    pub phone: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub department: String,
    pub roll_number: Option<String>,
}

/// A user with profile and upload count, as served by `/auth/full-detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    pub user: User,
    pub profile: Option<UserProfile>,
    pub uploaded_file_count: u64,
}

pub fn user_detail_key(user_id: Uuid) -> String {
    format!("user_detail:{}", user_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub year: Option<String>,
    pub storage_path: Option<String>,
}

/// Claims taken from a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedClaims {
    pub email: String,
    pub picture: Option<String>,
}

/// Account fields shared by signup, admin creation and import.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub picture: Option<String>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
}

/// One data row of an import spreadsheet. `row` is the 1-based sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub row: usize,
    pub email: String,
    pub username: String,
    pub role: String,
    pub password: String,
    pub picture: Option<String>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub row: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success_count: usize,
    pub failed: Vec<ImportFailure>,
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// A storage object opened for streaming.
pub struct ObjectStream {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

/// Storage object name for a fresh upload: `<uuid-hex>_<filename>`.
pub fn storage_object_name(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), filename)
}

/// Object key for a stored path.
///
/// Legacy rows hold a public URL (`.../object/public/<bucket>/<key>`); those
/// are reduced to `<key>`. Anything else is already a key.
pub fn object_key(stored: &str) -> &str {
    match stored.split_once("/object/public/") {
        Some((_, rest)) => rest.split_once('/').map_or(rest, |(_, key)| key),
        None => stored.trim_start_matches('/'),
    }
}

/// Last path component of an object key, used as the download file name.
pub fn display_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
