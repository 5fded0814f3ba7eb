use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use campus_session::session::SessionData;

use crate::domain::repository::{FileRepository, LookupCache, ObjectStorage};
use crate::domain::types::{
    ObjectStream, SIGNED_URL_CACHE_MARGIN_SECS, UploadedFile, display_name, object_key,
    storage_object_name,
};
use crate::error::AccountsServiceError;

// ── Signed URLs ──────────────────────────────────────────────────────────────

/// Cache-fronted URL signing.
pub struct SignedUrls<S: ObjectStorage, C: LookupCache> {
    pub storage: S,
    pub cache: C,
    pub ttl_secs: u64,
}

fn signed_url_key(key: &str) -> String {
    format!("signed_url:{}", key)
}

impl<S: ObjectStorage, C: LookupCache> SignedUrls<S, C> {
    /// Entries expire from the cache before the URL itself does.
    pub fn cache_ttl_secs(&self) -> u64 {
        self.ttl_secs.saturating_sub(SIGNED_URL_CACHE_MARGIN_SECS)
    }

    pub async fn signed_url(&self, key: &str) -> Result<String, AccountsServiceError> {
        let cache_key = signed_url_key(key);
        if let Some(url) = self.cache.get(&cache_key).await {
            return Ok(url);
        }
        let url = self.storage.sign(key, self.ttl_secs).await?;
        self.cache.set(&cache_key, &url, self.cache_ttl_secs()).await;
        Ok(url)
    }

    pub async fn forget(&self, key: &str) {
        self.cache.remove(&signed_url_key(key)).await;
    }
}

/// Admin and faculty may reach any object; others only their own.
/// Unknown or foreign objects both read as `FileNotFound`.
async fn authorize_object<F: FileRepository>(
    files: &F,
    caller: &SessionData,
    key: &str,
) -> Result<(), AccountsServiceError> {
    if key.is_empty() {
        return Err(AccountsServiceError::FileNotFound);
    }
    if caller.role.can_manage_files() || files.owns_object(caller.user_id, key).await? {
        Ok(())
    } else {
        Err(AccountsServiceError::FileNotFound)
    }
}

// ── Upload ───────────────────────────────────────────────────────────────────

pub struct UploadInput {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
    pub year: Option<String>,
}

pub struct UploadFileUseCase<F: FileRepository, S: ObjectStorage> {
    pub files: F,
    pub storage: S,
}

impl<F: FileRepository, S: ObjectStorage> UploadFileUseCase<F, S> {
    pub async fn execute(
        &self,
        owner: Uuid,
        input: UploadInput,
    ) -> Result<UploadedFile, AccountsServiceError> {
        let filename = input.filename.trim();
        if filename.is_empty() {
            return Err(AccountsServiceError::InvalidUpload("File name is required".into()));
        }
        let size = input.data.len() as i64;
        let key = storage_object_name(filename);
        let stored = self
            .storage
            .upload(&key, input.data, &input.content_type)
            .await?;

        let file = UploadedFile {
            id: Uuid::now_v7(),
            user_id: owner,
            filename: filename.to_owned(),
            size,
            uploaded_at: Utc::now(),
            year: input.year,
            storage_path: Some(stored),
        };
        self.files.create(&file).await?;
        tracing::info!(file_id = %file.id, user_id = %owner, size, "file uploaded");
        Ok(file)
    }
}

// ── Save metadata ────────────────────────────────────────────────────────────

pub struct SaveFileMetaInput {
    pub filename: String,
    pub size: i64,
    pub storage_path: Option<String>,
    pub year: Option<String>,
}

pub struct SaveFileMetaUseCase<F: FileRepository> {
    pub files: F,
}

impl<F: FileRepository> SaveFileMetaUseCase<F> {
    pub async fn execute(
        &self,
        owner: Uuid,
        input: SaveFileMetaInput,
    ) -> Result<UploadedFile, AccountsServiceError> {
        if input.filename.trim().is_empty() {
            return Err(AccountsServiceError::InvalidUpload("File name is required".into()));
        }
        if input.size < 0 {
            return Err(AccountsServiceError::InvalidUpload("File size cannot be negative".into()));
        }
        let file = UploadedFile {
            id: Uuid::now_v7(),
            user_id: owner,
            filename: input.filename.trim().to_owned(),
            size: input.size,
            uploaded_at: Utc::now(),
            year: input.year,
            storage_path: input.storage_path,
        };
        self.files.create(&file).await?;
        Ok(file)
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListedFile {
    pub file: UploadedFile,
    /// Signed URL, or the stored path when signing failed.
    pub url: Option<String>,
}

pub struct ListFilesUseCase<F: FileRepository, S: ObjectStorage, C: LookupCache> {
    pub files: F,
    pub signer: SignedUrls<S, C>,
}

impl<F: FileRepository, S: ObjectStorage, C: LookupCache> ListFilesUseCase<F, S, C> {
    pub async fn execute(
        &self,
        caller: &SessionData,
    ) -> Result<Vec<ListedFile>, AccountsServiceError> {
        let owner = (!caller.role.can_manage_files()).then_some(caller.user_id);
        let files = self.files.list(owner).await?;

        let mut listed = Vec::with_capacity(files.len());
        for file in files {
            let url = match file.storage_path.as_deref() {
                Some(path) => match self.signer.signed_url(object_key(path)).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        tracing::warn!(error = %e, file_id = %file.id, "signing failed, returning stored path");
                        Some(path.to_owned())
                    }
                },
                None => None,
            };
            listed.push(ListedFile { file, url });
        }
        Ok(listed)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteFileUseCase<F: FileRepository, S: ObjectStorage, C: LookupCache> {
    pub files: F,
    pub signer: SignedUrls<S, C>,
}

impl<F: FileRepository, S: ObjectStorage, C: LookupCache> DeleteFileUseCase<F, S, C> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        file_id: Uuid,
    ) -> Result<(), AccountsServiceError> {
        if !caller.role.can_manage_files() {
            return Err(AccountsServiceError::Forbidden);
        }
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or(AccountsServiceError::FileNotFound)?;

        if let Some(path) = file.storage_path.as_deref() {
            let key = object_key(path);
            if let Err(e) = self.signer.storage.remove(key).await {
                tracing::warn!(error = %e, file_id = %file.id, "storage removal failed");
            }
            self.signer.forget(key).await;
        }

        if !self.files.delete(file_id).await? {
            return Err(AccountsServiceError::FileNotFound);
        }
        tracing::info!(file_id = %file_id, user_id = %caller.user_id, "file deleted");
        Ok(())
    }
}

// ── Sign / stream ────────────────────────────────────────────────────────────

pub struct SignUrlUseCase<F: FileRepository, S: ObjectStorage, C: LookupCache> {
    pub files: F,
    pub signer: SignedUrls<S, C>,
}

impl<F: FileRepository, S: ObjectStorage, C: LookupCache> SignUrlUseCase<F, S, C> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        name: &str,
    ) -> Result<String, AccountsServiceError> {
        let key = object_key(name);
        authorize_object(&self.files, caller, key).await?;
        self.signer.signed_url(key).await
    }
}

pub struct StreamedObject {
    pub filename: String,
    pub object: ObjectStream,
}

pub struct StreamObjectUseCase<F: FileRepository, S: ObjectStorage, C: LookupCache> {
    pub files: F,
    pub signer: SignedUrls<S, C>,
}

impl<F: FileRepository, S: ObjectStorage, C: LookupCache> StreamObjectUseCase<F, S, C> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        path: &str,
    ) -> Result<StreamedObject, AccountsServiceError> {
        let key = object_key(path);
        authorize_object(&self.files, caller, key).await?;
        let url = self.signer.signed_url(key).await?;
        let object = self.signer.storage.fetch(&url).await?;
        Ok(StreamedObject {
            filename: display_name(key).to_owned(),
            object,
        })
    }
}
