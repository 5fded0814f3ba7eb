use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::issue::IssueStatus;
use campus_session::identity::CurrentUser;

use crate::domain::types::IssueRequestView;
use crate::error::InventoryServiceError;
use crate::handlers::item::ItemSummary;
use crate::state::AppState;
use crate::usecase::issue_request::{
    ApproveIssueRequestUseCase, CreateIssueRequestUseCase, DeleteIssueRequestUseCase,
    ListIssueRequestsUseCase, RejectIssueRequestUseCase,
};

#[derive(Serialize)]
pub struct RequesterResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
}

#[derive(Serialize)]
pub struct IssueRequestResponse {
    pub id: i32,
    pub item: ItemSummary,
    pub user: RequesterResponse,
    pub quantity: i32,
    pub status: IssueStatus,
    pub remarks: Option<String>,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "campus_core::serde::opt_to_rfc3339_ms")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl From<IssueRequestView> for IssueRequestResponse {
    fn from(view: IssueRequestView) -> Self {
        let IssueRequestView { request, item } = view;
        Self {
            id: request.id,
            item: item.into(),
            user: RequesterResponse {
                id: request.requester.user_id,
                email: request.requester.email,
                username: request.requester.username,
            },
            quantity: request.quantity,
            status: request.status,
            remarks: request.remarks,
            created_at: request.created_at,
            decided_at: request.decided_at,
        }
    }
}

// ── POST /issue-requests ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateIssueRequest {
    pub item_id: i32,
    pub quantity: i32,
    pub remarks: Option<String>,
}

pub async fn create_issue_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateIssueRequest>,
) -> Result<impl IntoResponse, InventoryServiceError> {
    let usecase = CreateIssueRequestUseCase {
        items: state.item_repo(),
        requests: state.request_repo(),
    };
    let request = usecase
        .execute(&current.data, body.item_id, body.quantity, body.remarks)
        .await?;
    Ok((StatusCode::CREATED, Json(IssueRequestResponse::from(request))))
}

// ── GET /issue-requests ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueRequestQuery {
    pub status: Option<String>,
}

pub async fn list_issue_requests(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<IssueRequestQuery>,
) -> Result<Json<Vec<IssueRequestResponse>>, InventoryServiceError> {
    let usecase = ListIssueRequestsUseCase {
        requests: state.request_repo(),
    };
    let requests = usecase
        .execute(&current.data, query.status.as_deref())
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

// ── POST /issue-requests/{id}/approve|reject ─────────────────────────────────

pub async fn approve_issue_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<IssueRequestResponse>, InventoryServiceError> {
    let usecase = ApproveIssueRequestUseCase {
        requests: state.request_repo(),
    };
    Ok(Json(usecase.execute(&current.data, id).await?.into()))
}

pub async fn reject_issue_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<IssueRequestResponse>, InventoryServiceError> {
    let usecase = RejectIssueRequestUseCase {
        requests: state.request_repo(),
    };
    Ok(Json(usecase.execute(&current.data, id).await?.into()))
}

// ── DELETE /issue-requests/{id} ──────────────────────────────────────────────

pub async fn delete_issue_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, InventoryServiceError> {
    let usecase = DeleteIssueRequestUseCase {
        requests: state.request_repo(),
    };
    usecase.execute(&current.data, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
