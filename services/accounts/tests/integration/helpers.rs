use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::{Duration, Utc};
use futures::stream;
use uuid::Uuid;

use campus_accounts::domain::repository::{
    FederatedVerifier, FileRepository, LookupCache, ObjectStorage, UserRepository,
};
use campus_accounts::domain::types::{
    FederatedClaims, ObjectStream, UploadedFile, User, UserProfile, object_key,
};
use campus_accounts::error::AccountsServiceError;
use campus_accounts::usecase::file::SignedUrls;
use campus_accounts::usecase::password::hash_password;
use campus_domain::user::UserRole;

pub const DOMAIN: &str = "lnmiit.ac.in";
pub const STRONG_PASSWORD: &str = "Quartz-Lantern-42";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(email: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        username: email.split('@').next().map(str::to_owned),
        password_hash: hash_password(STRONG_PASSWORD).unwrap(),
        role,
        is_active: true,
        profile_picture: None,
        phone: None,
        date_joined: now,
        updated_at: now,
    }
}

pub fn test_file(owner: Uuid, key: &str, age_minutes: i64) -> UploadedFile {
    UploadedFile {
        id: Uuid::now_v7(),
        user_id: owner,
        filename: key.rsplit('_').next().unwrap_or(key).to_owned(),
        size: 1024,
        uploaded_at: Utc::now() - Duration::minutes(age_minutes),
        year: Some("2024".into()),
        storage_path: Some(key.to_owned()),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub profiles: Arc<Mutex<Vec<UserProfile>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            profiles: Arc::default(),
        }
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles.lock().unwrap().push(profile);
        self
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn profile(&self, user_id: Uuid) -> Option<UserProfile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserRepository for MockUserRepo {
    async fn list(&self) -> Result<Vec<User>, AccountsServiceError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsServiceError> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError> {
        Ok(self.user_by_email(email))
    }

    async fn email_exists(
        &self,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AccountsServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == email && Some(u.id) != except))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AccountsServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username.as_deref() == Some(username)))
    }

    async fn roll_number_exists(
        &self,
        roll_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AccountsServiceError> {
        Ok(self.profiles.lock().unwrap().iter().any(|p| {
            p.roll_number.as_deref() == Some(roll_number) && Some(p.user_id) != except
        }))
    }

    async fn find_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, AccountsServiceError> {
        Ok(self.profile(user_id))
    }

    async fn create(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
    ) -> Result<(), AccountsServiceError> {
        self.users.lock().unwrap().push(user.clone());
        if let Some(profile) = profile {
            self.profiles.lock().unwrap().push(profile.clone());
        }
        Ok(())
    }

    async fn update(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
    ) -> Result<(), AccountsServiceError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AccountsServiceError::UserNotFound)?;
        *slot = user.clone();

        if let Some(profile) = profile {
            let mut profiles = self.profiles.lock().unwrap();
            profiles.retain(|p| p.user_id != profile.user_id);
            profiles.push(profile.clone());
        }
        Ok(())
    }
}

// ── MockFileRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockFileRepo {
    pub files: Arc<Mutex<Vec<UploadedFile>>>,
}

impl MockFileRepo {
    pub fn new(files: Vec<UploadedFile>) -> Self {
        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    pub fn all(&self) -> Vec<UploadedFile> {
        self.files.lock().unwrap().clone()
    }
}

impl FileRepository for MockFileRepo {
    async fn create(&self, file: &UploadedFile) -> Result<(), AccountsServiceError> {
        self.files.lock().unwrap().push(file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UploadedFile>, AccountsServiceError> {
        Ok(self.all().into_iter().find(|f| f.id == id))
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<UploadedFile>, AccountsServiceError> {
        let mut files: Vec<_> = self
            .all()
            .into_iter()
            .filter(|f| owner.is_none_or(|o| f.user_id == o))
            .collect();
        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(files)
    }

    async fn owns_object(&self, user_id: Uuid, key: &str) -> Result<bool, AccountsServiceError> {
        Ok(self.all().iter().any(|f| {
            f.user_id == user_id && f.storage_path.as_deref().map(object_key) == Some(key)
        }))
    }

    async fn count_by_owner(&self, user_id: Uuid) -> Result<u64, AccountsServiceError> {
        Ok(self.all().iter().filter(|f| f.user_id == user_id).count() as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccountsServiceError> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id != id);
        Ok(files.len() != before)
    }
}

// ── MockStorage ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockStorage {
    pub objects: Arc<Mutex<HashMap<String, Bytes>>>,
    pub sign_calls: Arc<Mutex<u32>>,
    pub removed: Arc<Mutex<Vec<String>>>,
    pub fail_sign: bool,
    pub fail_remove: bool,
}

impl MockStorage {
    pub fn failing_sign() -> Self {
        Self {
            fail_sign: true,
            ..Self::default()
        }
    }

    pub fn failing_remove() -> Self {
        Self {
            fail_remove: true,
            ..Self::default()
        }
    }

    pub fn with_object(self, key: &str, data: &'static [u8]) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), Bytes::from_static(data));
        self
    }

    pub fn sign_count(&self) -> u32 {
        *self.sign_calls.lock().unwrap()
    }
}

pub fn signed(key: &str) -> String {
    format!("https://storage.test/object/sign/uploads/{key}?token=t")
}

impl ObjectStorage for MockStorage {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<String, AccountsServiceError> {
        self.objects.lock().unwrap().insert(key.to_owned(), data);
        Ok(key.to_owned())
    }

    async fn sign(&self, key: &str, _expires_in_secs: u64) -> Result<String, AccountsServiceError> {
        *self.sign_calls.lock().unwrap() += 1;
        if self.fail_sign {
            return Err(AccountsServiceError::Storage("sign failed".into()));
        }
        Ok(signed(key))
    }

    async fn remove(&self, key: &str) -> Result<(), AccountsServiceError> {
        if self.fail_remove {
            return Err(AccountsServiceError::Storage("remove failed".into()));
        }
        self.objects.lock().unwrap().remove(key);
        self.removed.lock().unwrap().push(key.to_owned());
        Ok(())
    }

    async fn fetch(&self, signed_url: &str) -> Result<ObjectStream, AccountsServiceError> {
        let key = signed_url
            .split("/uploads/")
            .nth(1)
            .and_then(|rest| rest.split('?').next())
            .unwrap_or_default();
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or(AccountsServiceError::FileNotFound)?;
        Ok(ObjectStream {
            content_type: Some("application/pdf".into()),
            content_length: Some(data.len() as u64),
            body: Box::pin(stream::iter(vec![Ok(data)])),
        })
    }
}

// ── MockCache ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCache {
    pub entries: Arc<Mutex<HashMap<String, (String, u64)>>>,
}

impl MockCache {
    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

impl LookupCache for MockCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), (value.to_owned(), ttl_secs));
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

pub fn signer(storage: MockStorage, cache: MockCache) -> SignedUrls<MockStorage, MockCache> {
    SignedUrls {
        storage,
        cache,
        ttl_secs: 3600,
    }
}

// ── MockVerifier ─────────────────────────────────────────────────────────────

/// Accepts the token `"valid"` and yields the configured claims.
pub struct MockVerifier {
    pub claims: FederatedClaims,
}

impl MockVerifier {
    pub fn for_email(email: &str) -> Self {
        Self {
            claims: FederatedClaims {
                email: email.to_owned(),
                picture: Some("https://lh3.googleusercontent.com/a/pic".into()),
            },
        }
    }
}

impl FederatedVerifier for MockVerifier {
    async fn verify(&self, token: &str) -> Result<FederatedClaims, AccountsServiceError> {
        if token == "valid" {
            Ok(self.claims.clone())
        } else {
            Err(AccountsServiceError::InvalidGoogleToken)
        }
    }
}
