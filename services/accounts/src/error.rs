use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use campus_core::error::{ApiError, api_response};
use campus_session::session::SessionError;

/// Accounts service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    #[error("Only @{0} emails are allowed")]
    InvalidEmailDomain(String),
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("{}", .0.join(" "))]
    WeakPassword(Vec<String>),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User account is disabled")]
    AccountDisabled,
    #[error("{0}")]
    MissingProfileData(String),
    #[error("Roll number already exists")]
    RollNumberAlreadyExists,
    #[error("{0}")]
    InvalidRole(#[from] campus_domain::user::UnknownRole),
    #[error("User not found")]
    UserNotFound,
    #[error("File not found")]
    FileNotFound,
    #[error("Email not registered. Please sign up first.")]
    EmailNotRegistered,
    #[error("Invalid Google token")]
    InvalidGoogleToken,
    #[error("{0}")]
    InvalidSpreadsheet(String),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("{0}")]
    InvalidUpload(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("Permission denied")]
    Forbidden,
    #[error("{0}")]
    Storage(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError for AccountsServiceError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmailDomain(_)
            | Self::EmailAlreadyExists
            | Self::UsernameTaken
            | Self::WeakPassword(_)
            | Self::MissingProfileData(_)
            | Self::RollNumberAlreadyExists
            | Self::InvalidRole(_)
            | Self::EmailNotRegistered
            | Self::InvalidSpreadsheet(_)
            | Self::MissingColumns(_)
            | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidGoogleToken | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountDisabled | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmailDomain(_) => "INVALID_EMAIL_DOMAIN",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::MissingProfileData(_) => "MISSING_PROFILE_DATA",
            Self::RollNumberAlreadyExists => "ROLL_NUMBER_ALREADY_EXISTS",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::EmailNotRegistered => "EMAIL_NOT_REGISTERED",
            Self::InvalidGoogleToken => "INVALID_GOOGLE_TOKEN",
            Self::InvalidSpreadsheet(_) => "INVALID_SPREADSHEET",
            Self::MissingColumns(_) => "MISSING_COLUMNS",
            Self::InvalidUpload(_) => "INVALID_UPLOAD",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Storage(_) => "STORAGE",
            Self::Session(_) => "SESSION_STORE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AccountsServiceError {
    fn into_response(self) -> Response {
        api_response(&self)
    }
}
