use chrono::Utc;
use uuid::Uuid;

use campus_domain::email::{local_part, normalize_email};
use campus_domain::user::UserRole;
use campus_session::session::{SessionData, SessionStore};

use crate::domain::repository::{FederatedVerifier, FileRepository, LookupCache, UserRepository};
use crate::domain::types::{NewAccount, USER_DETAIL_TTL_SECS, User, UserDetail, user_detail_key};
use crate::error::AccountsServiceError;
use crate::usecase::account::{AccountRules, build_account, check_domain, session_for};
use crate::usecase::password::verify_password;

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct SignupUseCase<R: UserRepository> {
    pub users: R,
    pub allowed_domain: String,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<User, AccountsServiceError> {
        let account = NewAccount {
            email: input.email,
            username: input.username,
            password: input.password,
            role: UserRole::Student.as_str().to_owned(),
            ..Default::default()
        };
        let rules = AccountRules {
            allowed_domain: Some(&self.allowed_domain),
            require_profile: false,
        };
        let (user, profile) = build_account(&self.users, account, rules).await?;
        self.users.create(&user, profile.as_ref()).await?;
        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginOutput {
    pub user: User,
    pub session_id: String,
}

pub struct LoginUseCase<R: UserRepository, S: SessionStore> {
    pub users: R,
    pub sessions: S,
    pub allowed_domain: String,
}

impl<R: UserRepository, S: SessionStore> LoginUseCase<R, S> {
    pub async fn execute(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutput, AccountsServiceError> {
        let email = normalize_email(email);
        check_domain(&email, &self.allowed_domain)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AccountsServiceError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AccountsServiceError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AccountsServiceError::AccountDisabled);
        }

        let session_id = self.sessions.create(&session_for(&user)).await?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(LoginOutput { user, session_id })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionStore> {
    pub sessions: S,
}

impl<S: SessionStore> LogoutUseCase<S> {
    pub async fn execute(&self, session_id: Option<&str>) -> Result<(), AccountsServiceError> {
        if let Some(session_id) = session_id {
            self.sessions.destroy(session_id).await?;
        }
        Ok(())
    }
}

// ── Auth check ───────────────────────────────────────────────────────────────

pub struct CheckedUser {
    pub user: User,
    /// `Some` for students, holding their roll number if a profile exists.
    pub roll_number: Option<Option<String>>,
}

pub struct CheckAuthUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> CheckAuthUseCase<R> {
    /// Resolves the session against the stored user so admin edits show up
    /// before the session expires. A session whose user is gone reads as
    /// unauthenticated.
    pub async fn execute(
        &self,
        session: Option<SessionData>,
    ) -> Result<Option<CheckedUser>, AccountsServiceError> {
        let Some(session) = session else {
            return Ok(None);
        };
        let Some(user) = self.users.find_by_id(session.user_id).await? else {
            return Ok(None);
        };
        let roll_number = if user.role == UserRole::Student {
            let profile = self.users.find_profile(user.id).await?;
            Some(profile.and_then(|p| p.roll_number))
        } else {
            None
        };
        Ok(Some(CheckedUser { user, roll_number }))
    }
}

// ── Full detail ──────────────────────────────────────────────────────────────

pub struct FullDetailUseCase<R: UserRepository, F: FileRepository, C: LookupCache> {
    pub users: R,
    pub files: F,
    pub cache: C,
}

impl<R: UserRepository, F: FileRepository, C: LookupCache> FullDetailUseCase<R, F, C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<UserDetail, AccountsServiceError> {
        let key = user_detail_key(user_id);
        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<UserDetail>(&cached) {
                Ok(detail) => return Ok(detail),
                Err(e) => tracing::warn!(error = %e, key, "discarding corrupt cache entry"),
            }
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountsServiceError::UserNotFound)?;
        let profile = self.users.find_profile(user_id).await?;
        let uploaded_file_count = self.files.count_by_owner(user_id).await?;
        let detail = UserDetail {
            user,
            profile,
            uploaded_file_count,
        };

        match serde_json::to_string(&detail) {
            Ok(raw) => self.cache.set(&key, &raw, USER_DETAIL_TTL_SECS).await,
            Err(e) => tracing::warn!(error = %e, key, "user detail not cacheable"),
        }
        Ok(detail)
    }
}

// ── Google login ─────────────────────────────────────────────────────────────

pub struct GoogleLoginUseCase<
    R: UserRepository,
    S: SessionStore,
    V: FederatedVerifier,
    C: LookupCache,
> {
    pub users: R,
    pub sessions: S,
    pub verifier: V,
    pub cache: C,
}

impl<R: UserRepository, S: SessionStore, V: FederatedVerifier, C: LookupCache>
    GoogleLoginUseCase<R, S, V, C>
{
    pub async fn execute(&self, token: &str) -> Result<LoginOutput, AccountsServiceError> {
        let claims = self.verifier.verify(token).await?;
        let email = normalize_email(&claims.email);

        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AccountsServiceError::EmailNotRegistered)?;
        if !user.is_active {
            return Err(AccountsServiceError::AccountDisabled);
        }

        if user.profile_picture.is_none() && claims.picture.is_some() {
            user.profile_picture = claims.picture;
            user.updated_at = Utc::now();
            self.users.update(&user, None).await?;
            self.cache.remove(&user_detail_key(user.id)).await;
        }

        let session_id = self.sessions.create(&session_for(&user)).await?;
        tracing::info!(user_id = %user.id, "user logged in with Google");
        Ok(LoginOutput { user, session_id })
    }
}

// ── Google signup ────────────────────────────────────────────────────────────

pub struct GoogleSignupUseCase<R: UserRepository, S: SessionStore, V: FederatedVerifier> {
    pub users: R,
    pub sessions: S,
    pub verifier: V,
    pub allowed_domain: String,
}

impl<R: UserRepository, S: SessionStore, V: FederatedVerifier> GoogleSignupUseCase<R, S, V> {
    pub async fn execute(
        &self,
        token: &str,
        password: &str,
    ) -> Result<LoginOutput, AccountsServiceError> {
        let claims = self.verifier.verify(token).await?;
        let email = normalize_email(&claims.email);
        check_domain(&email, &self.allowed_domain)?;
        if self.users.email_exists(&email, None).await? {
            return Err(AccountsServiceError::EmailAlreadyExists);
        }

        let username = local_part(&email).to_owned();
        if self.users.username_exists(&username).await? {
            return Err(AccountsServiceError::UsernameTaken);
        }

        let account = NewAccount {
            email,
            username,
            password: password.to_owned(),
            role: UserRole::Student.as_str().to_owned(),
            picture: claims.picture,
            ..Default::default()
        };
        let rules = AccountRules {
            allowed_domain: Some(&self.allowed_domain),
            require_profile: false,
        };
        let (user, profile) = build_account(&self.users, account, rules).await?;
        self.users.create(&user, profile.as_ref()).await?;

        let session_id = self.sessions.create(&session_for(&user)).await?;
        tracing::info!(user_id = %user.id, "user signed up with Google");
        Ok(LoginOutput { user, session_id })
    }
}
