//! Account creation rules shared by signup, admin creation and import.

use chrono::Utc;
use uuid::Uuid;

use campus_domain::email::{is_institutional, local_part, normalize_email};
use campus_domain::password::validate_password;
use campus_domain::user::UserRole;
use campus_session::session::SessionData;

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewAccount, User, UserProfile};
use crate::error::AccountsServiceError;
use crate::usecase::password::hash_password;

/// Which checks apply to a new account.
#[derive(Debug, Clone, Copy)]
pub struct AccountRules<'a> {
    /// Restrict the email to this domain.
    pub allowed_domain: Option<&'a str>,
    /// Demand the role's profile fields (roll number, department).
    pub require_profile: bool,
}

/// Validate `input` and build the user and profile rows to insert. Nothing is written.
pub async fn build_account<R: UserRepository>(
    users: &R,
    input: NewAccount,
    rules: AccountRules<'_>,
) -> Result<(User, Option<UserProfile>), AccountsServiceError> {
    let email = normalize_email(&input.email);
    if let Some(domain) = rules.allowed_domain {
        check_domain(&email, domain)?;
    }
    if users.email_exists(&email, None).await? {
        return Err(AccountsServiceError::EmailAlreadyExists);
    }

    let role: UserRole = input.role.parse()?;
    let department = non_empty(input.department);
    let roll_number = non_empty(input.roll_number);
    let id = Uuid::now_v7();

    let profile = if !rules.require_profile {
        None
    } else if role.requires_roll_number() {
        let (Some(roll_number), Some(department)) = (roll_number, department) else {
            return Err(AccountsServiceError::MissingProfileData(
                "Student must have roll_number and department".into(),
            ));
        };
        if users.roll_number_exists(&roll_number, None).await? {
            return Err(AccountsServiceError::RollNumberAlreadyExists);
        }
        Some(UserProfile {
            user_id: id,
            department,
            roll_number: Some(roll_number),
        })
    } else if role.requires_department() {
        let Some(department) = department else {
            return Err(AccountsServiceError::MissingProfileData(format!(
                "{} must have a department",
                capitalize(role.as_str())
            )));
        };
        Some(UserProfile {
            user_id: id,
            department,
            roll_number: None,
        })
    } else {
        None
    };

    let username = non_empty(Some(input.username));
    let attributes = [username.as_deref().unwrap_or(""), local_part(&email)];
    let problems = validate_password(&input.password, &attributes);
    if !problems.is_empty() {
        return Err(AccountsServiceError::WeakPassword(problems));
    }

    let now = Utc::now();
    let user = User {
        id,
        email,
        username,
        password_hash: hash_password(&input.password)?,
        role,
        is_active: true,
        profile_picture: non_empty(input.picture),
        phone: None,
        date_joined: now,
        updated_at: now,
    };
    Ok((user, profile))
}

pub fn check_domain(email: &str, domain: &str) -> Result<(), AccountsServiceError> {
    if is_institutional(email, domain) {
        Ok(())
    } else {
        Err(AccountsServiceError::InvalidEmailDomain(
            domain.trim_start_matches('@').to_owned(),
        ))
    }
}

/// Session payload for a signed-in user.
pub fn session_for(user: &User) -> SessionData {
    SessionData {
        user_id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        role: user.role,
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
