//! Google ID token verification against Google's published JWKS.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::repository::FederatedVerifier;
use crate::domain::types::FederatedClaims;
use crate::error::AccountsServiceError;

pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

const ALLOWED_ISSUERS: &[&str] = &["accounts.google.com", "https://accounts.google.com"];

const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    email: Option<String>,
    email_verified: Option<bool>,
    picture: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

struct CachedKeys {
    keys: HashMap<String, Jwk>,
    fetched_at: Instant,
}

#[derive(Clone)]
pub struct GoogleTokenVerifier {
    client: Client,
    client_id: String,
    jwks_url: String,
    cache: Arc<RwLock<Option<CachedKeys>>>,
}

impl GoogleTokenVerifier {
    pub fn new(client: Client, client_id: String) -> Self {
        Self {
            client,
            client_id,
            jwks_url: GOOGLE_JWKS_URL.to_owned(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AccountsServiceError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < JWKS_CACHE_TTL {
                    if let Some(jwk) = cached.keys.get(kid) {
                        return jwk_to_decoding_key(jwk);
                    }
                }
            }
        }

        let set: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .context("fetch Google JWKS")?
            .error_for_status()
            .context("fetch Google JWKS")?
            .json()
            .await
            .context("parse Google JWKS")?;

        let keys: HashMap<String, Jwk> = set
            .keys
            .into_iter()
            .map(|jwk| (jwk.kid.clone(), jwk))
            .collect();
        let key = match keys.get(kid) {
            Some(jwk) => jwk_to_decoding_key(jwk)?,
            None => {
                tracing::warn!(kid, "Google token signed with unknown key");
                return Err(AccountsServiceError::InvalidGoogleToken);
            }
        };

        *self.cache.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(key)
    }
}

fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AccountsServiceError> {
    if jwk.kty != "RSA" {
        tracing::warn!(kty = %jwk.kty, "unsupported JWK key type");
        return Err(AccountsServiceError::InvalidGoogleToken);
    }
    DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
        tracing::warn!(error = %e, "malformed JWK");
        AccountsServiceError::InvalidGoogleToken
    })
}

impl FederatedVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<FederatedClaims, AccountsServiceError> {
        let header = decode_header(token).map_err(|e| {
            tracing::warn!(error = %e, "invalid Google token header");
            AccountsServiceError::InvalidGoogleToken
        })?;
        let kid = header.kid.ok_or(AccountsServiceError::InvalidGoogleToken)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(ALLOWED_ISSUERS);

        let claims = decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|e| {
                tracing::warn!(error = %e, "Google token rejected");
                AccountsServiceError::InvalidGoogleToken
            })?
            .claims;

        if claims.email_verified != Some(true) {
            return Err(AccountsServiceError::InvalidGoogleToken);
        }
        let email = claims.email.ok_or(AccountsServiceError::InvalidGoogleToken)?;
        Ok(FederatedClaims {
            email,
            picture: claims.picture,
        })
    }
}
