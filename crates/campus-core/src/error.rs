use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error envelope returned by every service.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

/// Service error enums implement this to share one response shape.
pub trait ApiError: std::error::Error {
    fn status(&self) -> StatusCode;

    /// Stable machine-readable error code (`SCREAMING_SNAKE_CASE`).
    fn kind(&self) -> &'static str;
}

/// Render an [`ApiError`] as `{"kind", "message"}` with its status code.
pub fn api_response<E: ApiError>(error: &E) -> Response {
    let status = error.status();
    // 4xx are already visible in the TraceLayer span.
    if status.is_server_error() {
        tracing::error!(error = %error, kind = error.kind(), "internal error");
    }
    error_response(status, error.kind(), error.to_string())
}

pub fn error_response(status: StatusCode, kind: &'static str, message: String) -> Response {
    (status, axum::Json(ErrorBody { kind, message })).into_response()
}
