use chrono::Utc;
use uuid::Uuid;

use campus_domain::email::normalize_email;
use campus_domain::user::{UserRole, department_from_roll_number};

use crate::domain::repository::{LookupCache, UserRepository};
use crate::domain::types::{
    ImportFailure, ImportRow, ImportSummary, NewAccount, User, UserProfile, user_detail_key,
};
use crate::error::AccountsServiceError;
use crate::usecase::account::{AccountRules, build_account, non_empty};

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<User>, AccountsServiceError> {
        self.users.list().await
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: NewAccount) -> Result<User, AccountsServiceError> {
        let rules = AccountRules {
            allowed_domain: None,
            require_profile: true,
        };
        let (user, profile) = build_account(&self.users, input, rules).await?;
        self.users.create(&user, profile.as_ref()).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created by admin");
        Ok(user)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
}

pub struct UpdateUserUseCase<R: UserRepository, C: LookupCache> {
    pub users: R,
    pub cache: C,
}

impl<R: UserRepository, C: LookupCache> UpdateUserUseCase<R, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, AccountsServiceError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountsServiceError::UserNotFound)?;

        if let Some(username) = non_empty(input.username) {
            user.username = Some(username);
        }

        if let Some(email) = non_empty(input.email) {
            let email = normalize_email(&email);
            if self.users.email_exists(&email, Some(user_id)).await? {
                return Err(AccountsServiceError::EmailAlreadyExists);
            }
            user.email = email;
        }

        let department = non_empty(input.department);
        let roll_number = non_empty(input.roll_number);
        let existing = self.users.find_profile(user_id).await?;

        // Profiles are created on demand, never blank.
        let touched = existing.is_some() || department.is_some() || roll_number.is_some();
        let profile = match user.role {
            UserRole::Student if touched => {
                let mut profile = existing.unwrap_or_else(|| empty_profile(user_id));
                if let Some(roll_number) = roll_number {
                    if self
                        .users
                        .roll_number_exists(&roll_number, Some(user_id))
                        .await?
                    {
                        return Err(AccountsServiceError::RollNumberAlreadyExists);
                    }
                    if let Some(code) = department_from_roll_number(&roll_number) {
                        profile.department = code;
                    }
                    user.username = Some(roll_number.clone());
                    profile.roll_number = Some(roll_number);
                }
                if let Some(department) = department {
                    profile.department = department;
                }
                Some(profile)
            }
            UserRole::Faculty | UserRole::Staff if existing.is_some() || department.is_some() => {
                let mut profile = existing.unwrap_or_else(|| empty_profile(user_id));
                if let Some(department) = department {
                    profile.department = department;
                }
                Some(profile)
            }
            _ => None,
        };

        user.updated_at = Utc::now();
        self.users.update(&user, profile.as_ref()).await?;
        self.cache.remove(&user_detail_key(user_id)).await;
        tracing::info!(user_id = %user.id, "user updated by admin");
        Ok(user)
    }
}

fn empty_profile(user_id: Uuid) -> UserProfile {
    UserProfile {
        user_id,
        department: String::new(),
        roll_number: None,
    }
}

// ── ImportUsers ──────────────────────────────────────────────────────────────

pub struct ImportUsersUseCase<R: UserRepository> {
    pub users: R,
    pub allowed_domain: String,
}

impl<R: UserRepository> ImportUsersUseCase<R> {
    /// Create one account per row. A failing row is recorded and skipped.
    pub async fn execute(&self, rows: Vec<ImportRow>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for row in rows {
            let line = row.row;
            match self.import_row(row).await {
                Ok(()) => summary.success_count += 1,
                Err(e) => summary.failed.push(ImportFailure {
                    row: line,
                    error: e.to_string(),
                }),
            }
        }
        tracing::info!(
            success_count = summary.success_count,
            failed = summary.failed.len(),
            "user import finished"
        );
        summary
    }

    async fn import_row(&self, row: ImportRow) -> Result<(), AccountsServiceError> {
        let account = NewAccount {
            email: row.email,
            username: row.username,
            password: row.password,
            role: row.role,
            picture: row.picture,
            department: row.department,
            roll_number: row.roll_number,
        };
        let rules = AccountRules {
            allowed_domain: Some(&self.allowed_domain),
            require_profile: true,
        };
        let (user, profile) = build_account(&self.users, account, rules).await?;
        self.users.create(&user, profile.as_ref()).await
    }
}
