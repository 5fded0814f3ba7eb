use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_session::identity::CurrentUser;

use crate::domain::types::UploadedFile;
use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::file::{
    DeleteFileUseCase, ListFilesUseCase, SaveFileMetaInput, SaveFileMetaUseCase, SignUrlUseCase,
    StreamObjectUseCase, UploadFileUseCase, UploadInput,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub filename: String,
    pub size: i64,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub uploaded_at: DateTime<Utc>,
    pub cdn_url: Option<String>,
    pub year: Option<String>,
}

impl FileResponse {
    fn new(file: UploadedFile, cdn_url: Option<String>) -> Self {
        Self {
            id: file.id,
            user: file.user_id,
            filename: file.filename,
            size: file.size,
            uploaded_at: file.uploaded_at,
            cdn_url,
            year: file.year,
        }
    }
}

// ── POST /upload ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub url: Option<String>,
    pub size: i64,
    pub id: Uuid,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub uploaded_at: DateTime<Utc>,
    pub year: Option<String>,
}

struct UploadForm {
    filename: String,
    content_type: String,
    data: Bytes,
    year: Option<String>,
}

async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, AccountsServiceError> {
    let mut file = None;
    let mut year = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AccountsServiceError::InvalidUpload(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_owned).unwrap_or_default();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_owned();
                let data = field.bytes().await.map_err(|e| {
                    AccountsServiceError::InvalidUpload(format!("failed to read upload: {e}"))
                })?;
                file = Some((filename, content_type, data));
            }
            "year" | "year[]" if year.is_none() => {
                let value = field.text().await.map_err(|e| {
                    AccountsServiceError::InvalidUpload(format!("failed to read field: {e}"))
                })?;
                year = Some(value.trim().to_owned()).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let (filename, content_type, data) = file.ok_or_else(|| {
        AccountsServiceError::InvalidUpload("missing multipart field `file`".into())
    })?;
    Ok(UploadForm {
        filename,
        content_type,
        data,
        year,
    })
}

pub async fn upload_file(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AccountsServiceError> {
    let form = parse_upload_form(multipart).await?;
    let usecase = UploadFileUseCase {
        files: state.file_repo(),
        storage: state.storage.clone(),
    };
    let file = usecase
        .execute(
            current.data.user_id,
            UploadInput {
                filename: form.filename,
                content_type: form.content_type,
                data: form.data,
                year: form.year,
            },
        )
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        filename: file.filename,
        url: file.storage_path,
        size: file.size,
        id: file.id,
        uploaded_at: file.uploaded_at,
        year: file.year,
    }))
}

// ── POST /save-file-meta ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveFileMetaRequest {
    pub filename: String,
    pub size: i64,
    pub cdn_url: Option<String>,
    pub year: Option<String>,
}

pub async fn save_file_meta(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<SaveFileMetaRequest>,
) -> Result<Json<FileResponse>, AccountsServiceError> {
    let usecase = SaveFileMetaUseCase {
        files: state.file_repo(),
    };
    let file = usecase
        .execute(
            current.data.user_id,
            SaveFileMetaInput {
                filename: body.filename,
                size: body.size,
                storage_path: body.cdn_url,
                year: body.year,
            },
        )
        .await?;
    let cdn_url = file.storage_path.clone();
    Ok(Json(FileResponse::new(file, cdn_url)))
}

// ── GET /uploaded-files ──────────────────────────────────────────────────────

pub async fn list_uploaded_files(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<FileResponse>>, AccountsServiceError> {
    let usecase = ListFilesUseCase {
        files: state.file_repo(),
        signer: state.signed_urls(),
    };
    let listed = usecase.execute(&current.data).await?;
    Ok(Json(
        listed
            .into_iter()
            .map(|l| FileResponse::new(l.file, l.url))
            .collect(),
    ))
}

// ── DELETE /uploaded-files/{id}/delete ───────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteFileResponse {
    pub success: bool,
    pub detail: &'static str,
}

pub async fn delete_uploaded_file(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(file_id): Path<Uuid>,
) -> Result<Json<DeleteFileResponse>, AccountsServiceError> {
    let usecase = DeleteFileUseCase {
        files: state.file_repo(),
        signer: state.signed_urls(),
    };
    usecase.execute(&current.data, file_id).await?;
    Ok(Json(DeleteFileResponse {
        success: true,
        detail: "File deleted successfully.",
    }))
}

// ── GET /get-signed-url/{name} ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct SignedUrlResponse {
    pub signed_url: String,
}

pub async fn get_signed_url(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<SignedUrlResponse>, AccountsServiceError> {
    let usecase = SignUrlUseCase {
        files: state.file_repo(),
        signer: state.signed_urls(),
    };
    let signed_url = usecase.execute(&current.data, &name).await?;
    Ok(Json(SignedUrlResponse { signed_url }))
}

// ── GET /secure-stream ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SecureStreamQuery {
    pub path: String,
}

pub async fn secure_stream(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<SecureStreamQuery>,
) -> Result<Response, AccountsServiceError> {
    let usecase = StreamObjectUseCase {
        files: state.file_repo(),
        signer: state.signed_urls(),
    };
    let streamed = usecase.execute(&current.data, &query.path).await?;
    let object = streamed.object;

    let mut response = (StatusCode::OK, Body::from_stream(object.body)).into_response();
    let headers = response.headers_mut();
    let content_type = object
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Some(len) = object.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    if let Ok(disposition) = HeaderValue::from_str(&content_disposition(&streamed.filename)) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok(response)
}

fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("inline; filename=\"{}\"", safe)
}
