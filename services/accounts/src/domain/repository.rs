#![allow(async_fn_in_trait)]

use bytes::Bytes;
use uuid::Uuid;

use crate::domain::types::{FederatedClaims, ObjectStream, UploadedFile, User, UserProfile};
use crate::error::AccountsServiceError;

/// Repository for accounts and their profiles.
pub trait UserRepository: Send + Sync {
    /// All users ordered by username.
    async fn list(&self) -> Result<Vec<User>, AccountsServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError>;

    /// `true` if another user (not `except`) already uses `email`.
    async fn email_exists(
        &self,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AccountsServiceError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AccountsServiceError>;

    /// `true` if a profile other than `except`'s holds `roll_number`.
    async fn roll_number_exists(
        &self,
        roll_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AccountsServiceError>;

    async fn find_profile(&self, user_id: Uuid)
    -> Result<Option<UserProfile>, AccountsServiceError>;

    /// Insert a user and its profile in one transaction.
    async fn create(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
    ) -> Result<(), AccountsServiceError>;

    /// Update a user and upsert its profile in one transaction.
    async fn update(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
    ) -> Result<(), AccountsServiceError>;
}

/// Repository for uploaded-file metadata.
pub trait FileRepository: Send + Sync {
    async fn create(&self, file: &UploadedFile) -> Result<(), AccountsServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UploadedFile>, AccountsServiceError>;

    /// Files newest first, restricted to `owner` when given.
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<UploadedFile>, AccountsServiceError>;

    /// `true` if `user_id` has a file whose object key is `key`.
    async fn owns_object(&self, user_id: Uuid, key: &str) -> Result<bool, AccountsServiceError>;

    async fn count_by_owner(&self, user_id: Uuid) -> Result<u64, AccountsServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AccountsServiceError>;
}

/// Private object storage addressed by object key.
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key` and return the stored key.
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, AccountsServiceError>;

    /// Time-limited URL for `key`.
    async fn sign(&self, key: &str, expires_in_secs: u64) -> Result<String, AccountsServiceError>;

    async fn remove(&self, key: &str) -> Result<(), AccountsServiceError>;

    /// Open a signed URL for streaming. A missing object is `FileNotFound`.
    async fn fetch(&self, signed_url: &str) -> Result<ObjectStream, AccountsServiceError>;
}

/// Short-TTL key-value cache. Failures degrade to a miss.
pub trait LookupCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str, ttl_secs: u64);

    async fn remove(&self, key: &str);
}

/// Verifies third-party identity tokens.
pub trait FederatedVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<FederatedClaims, AccountsServiceError>;
}
