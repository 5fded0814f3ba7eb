use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use campus_session::identity::CurrentUser;

use crate::domain::types::NewAccount;
use crate::error::AccountsServiceError;
use crate::handlers::auth::UserResponse;
use crate::infra::spreadsheet::read_user_sheet;
use crate::state::AppState;
use crate::usecase::admin::{
    CreateUserUseCase, ImportUsersUseCase, ListUsersUseCase, UpdateUserInput, UpdateUserUseCase,
};

fn require_admin(current: &CurrentUser) -> Result<(), AccountsServiceError> {
    if current.role().is_admin() {
        Ok(())
    } else {
        Err(AccountsServiceError::Forbidden)
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, AccountsServiceError> {
    require_admin(&current)?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /admin/create-user ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub roll_number: Option<String>,
    pub department: Option<String>,
    pub picture: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    require_admin(&current)?;
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(NewAccount {
            email: body.email,
            username: body.username,
            password: body.password,
            role: body.role,
            picture: body.picture,
            department: body.department,
            roll_number: body.roll_number,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ── PUT /users/{id}/update ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
}

pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AccountsServiceError> {
    require_admin(&current)?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        cache: state.lookup_cache(),
    };
    let user = usecase
        .execute(
            user_id,
            UpdateUserInput {
                username: body.username,
                email: body.email,
                department: body.department,
                roll_number: body.roll_number,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── POST /admin/import-users ─────────────────────────────────────────────────

pub async fn import_users(
    State(state): State<AppState>,
    current: CurrentUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AccountsServiceError> {
    require_admin(&current)?;

    let mut sheet = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AccountsServiceError::InvalidUpload(format!("invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AccountsServiceError::InvalidUpload(format!("failed to read upload: {e}")))?;
            sheet = Some(data);
        }
    }
    let sheet = sheet.ok_or_else(|| AccountsServiceError::InvalidUpload("No file uploaded".into()))?;

    let rows = read_user_sheet(sheet.to_vec()).await?;
    let usecase = ImportUsersUseCase {
        users: state.user_repo(),
        allowed_domain: state.allowed_email_domain.clone(),
    };
    let summary = usecase.execute(rows).await;
    Ok((StatusCode::CREATED, Json(summary)))
}
