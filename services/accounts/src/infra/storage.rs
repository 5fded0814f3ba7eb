//! Supabase-style storage REST client.

use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use url::Url;

use crate::domain::repository::ObjectStorage;
use crate::domain::types::ObjectStream;
use crate::error::AccountsServiceError;

const API_PREFIX: [&str; 2] = ["storage", "v1"];

#[derive(Clone)]
pub struct SupabaseStorage {
    pub client: Client,
    pub base_url: Url,
    pub api_key: String,
    pub bucket: String,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(client: Client, base_url: &str, api_key: String, bucket: String) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            api_key,
            bucket,
        })
    }

    /// `<base>/storage/v1/<segments...>`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AccountsServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AccountsServiceError::Storage("storage URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    /// Object keys may contain `/`; each part becomes its own segment.
    fn object_endpoint(&self, prefix: &[&str], key: &str) -> Result<Url, AccountsServiceError> {
        let segments: Vec<&str> = prefix
            .iter()
            .copied()
            .chain(std::iter::once(self.bucket.as_str()))
            .chain(key.split('/').filter(|s| !s.is_empty()))
            .collect();
        self.endpoint(&segments)
    }

    /// Signed paths come back relative to `/storage/v1`.
    fn absolute_signed_url(&self, signed_path: &str) -> String {
        if signed_path.starts_with("http://") || signed_path.starts_with("https://") {
            return signed_path.to_owned();
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/storage/v1/{}", signed_path.trim_start_matches('/'))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }
}

async fn failure(action: &str, response: reqwest::Response) -> AccountsServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AccountsServiceError::Storage(format!("{action} failed: {status} {body}"))
}

fn transport(action: &str, e: reqwest::Error) -> AccountsServiceError {
    AccountsServiceError::Storage(format!("{action} failed: {e}"))
}

impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, AccountsServiceError> {
        let url = self.object_endpoint(&["object"], key)?;
        let response = self
            .authorized(self.client.post(url))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| transport("Upload", e))?;
        if !response.status().is_success() {
            return Err(failure("Upload", response).await);
        }
        tracing::info!(bucket = %self.bucket, key, "object uploaded");
        Ok(key.to_owned())
    }

    async fn sign(&self, key: &str, expires_in_secs: u64) -> Result<String, AccountsServiceError> {
        let url = self.object_endpoint(&["object", "sign"], key)?;
        let response = self
            .authorized(self.client.post(url))
            .json(&serde_json::json!({ "expiresIn": expires_in_secs }))
            .send()
            .await
            .map_err(|e| transport("Signed URL generation", e))?;
        if !response.status().is_success() {
            return Err(failure("Signed URL generation", response).await);
        }
        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| transport("Signed URL generation", e))?;
        Ok(self.absolute_signed_url(&body.signed_url))
    }

    async fn remove(&self, key: &str) -> Result<(), AccountsServiceError> {
        let url = self.endpoint(&["object", self.bucket.as_str()])?;
        let response = self
            .authorized(self.client.delete(url))
            .json(&serde_json::json!({ "prefixes": [key] }))
            .send()
            .await
            .map_err(|e| transport("Delete", e))?;
        if !response.status().is_success() {
            return Err(failure("Delete", response).await);
        }
        tracing::info!(bucket = %self.bucket, key, "object removed");
        Ok(())
    }

    async fn fetch(&self, signed_url: &str) -> Result<ObjectStream, AccountsServiceError> {
        let response = self
            .client
            .get(signed_url)
            .send()
            .await
            .map_err(|e| transport("Fetch", e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AccountsServiceError::FileNotFound);
        }
        if !response.status().is_success() {
            return Err(failure("Fetch", response).await);
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let content_length = response.content_length();
        let body = response.bytes_stream().map_err(std::io::Error::other);
        Ok(ObjectStream {
            content_type,
            content_length,
            body: Box::pin(body),
        })
    }
}
