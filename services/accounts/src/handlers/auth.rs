use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::user::UserRole;
use campus_session::{
    cookie::{clear_session_cookie, session_id, set_session_cookie},
    identity::{CurrentUser, MaybeUser},
};

use crate::domain::types::{User, UserDetail};
use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::auth::{
    CheckAuthUseCase, FullDetailUseCase, GoogleLoginUseCase, GoogleSignupUseCase, LoginUseCase,
    LogoutUseCase, SignupInput, SignupUseCase,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub role: UserRole,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub date_joined: DateTime<Utc>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            date_joined: u.date_joined,
            is_active: u.is_active,
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /signup ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
        allowed_domain: state.allowed_email_domain.clone(),
    };
    let user = usecase
        .execute(SignupInput {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        sessions: state.sessions(),
        allowed_domain: state.allowed_email_domain.clone(),
    };
    let out = usecase.execute(&body.email, &body.password).await?;

    let jar = set_session_cookie(jar, out.session_id, state.cookie_domain.clone());
    Ok((jar, Json(UserResponse::from(out.user))))
}

// ── POST /logout ─────────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = LogoutUseCase {
        sessions: state.sessions(),
    };
    usecase.execute(session_id(&jar).as_deref()).await?;

    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    ))
}

// ── GET /auth/check ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckedUserResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<Option<String>>,
}

#[derive(Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    pub user: Option<CheckedUserResponse>,
}

pub async fn check_auth(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
) -> Result<Json<CheckAuthResponse>, AccountsServiceError> {
    let usecase = CheckAuthUseCase {
        users: state.user_repo(),
    };
    let checked = usecase.execute(current.map(|c| c.data)).await?;

    let user = checked.map(|c| CheckedUserResponse {
        id: c.user.id,
        username: c.user.username,
        email: c.user.email,
        role: c.user.role,
        roll_number: c.roll_number,
    });
    Ok(Json(CheckAuthResponse {
        authenticated: user.is_some(),
        user,
    }))
}

// ── GET /auth/full-detail ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FullDetailResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub profile_picture: Option<String>,
    pub phone: Option<String>,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub date_joined: DateTime<Utc>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
    pub uploaded_file_count: u64,
}

impl From<UserDetail> for FullDetailResponse {
    fn from(d: UserDetail) -> Self {
        let (department, roll_number) = match d.profile {
            Some(p) => (Some(p.department), p.roll_number),
            None => (None, None),
        };
        Self {
            id: d.user.id,
            username: d.user.username,
            email: d.user.email,
            role: d.user.role,
            is_active: d.user.is_active,
            profile_picture: d.user.profile_picture,
            phone: d.user.phone,
            date_joined: d.user.date_joined,
            department,
            roll_number,
            uploaded_file_count: d.uploaded_file_count,
        }
    }
}

pub async fn full_detail(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<FullDetailResponse>, AccountsServiceError> {
    let usecase = FullDetailUseCase {
        users: state.user_repo(),
        files: state.file_repo(),
        cache: state.lookup_cache(),
    };
    let detail = usecase.execute(current.data.user_id).await?;
    Ok(Json(detail.into()))
}

// ── POST /auth/google-login ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub token: String,
}

#[derive(Serialize)]
pub struct GoogleLoginResponse {
    pub message: &'static str,
    pub email: String,
    pub username: Option<String>,
}

pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = GoogleLoginUseCase {
        users: state.user_repo(),
        sessions: state.sessions(),
        verifier: state.google.clone(),
        cache: state.lookup_cache(),
    };
    let out = usecase.execute(&body.token).await?;

    let jar = set_session_cookie(jar, out.session_id, state.cookie_domain.clone());
    Ok((
        jar,
        Json(GoogleLoginResponse {
            message: "Login successful",
            email: out.user.email,
            username: out.user.username,
        }),
    ))
}

// ── POST /auth/google-signup ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleSignupRequest {
    pub token: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct GoogleSignupResponse {
    pub message: &'static str,
    pub username: Option<String>,
    pub email: String,
}

pub async fn google_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GoogleSignupRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = GoogleSignupUseCase {
        users: state.user_repo(),
        sessions: state.sessions(),
        verifier: state.google.clone(),
        allowed_domain: state.allowed_email_domain.clone(),
    };
    let out = usecase.execute(&body.token, &body.password).await?;

    let jar = set_session_cookie(jar, out.session_id, state.cookie_domain.clone());
    Ok((
        StatusCode::CREATED,
        jar,
        Json(GoogleSignupResponse {
            message: "Signup successful",
            username: out.user.username,
            email: out.user.email,
        }),
    ))
}
