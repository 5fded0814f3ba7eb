use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

use campus_core::health::{healthz, readyz};
use campus_core::middleware::{cors_layer, with_observability};

use crate::handlers::{
    admin::{create_user, import_users, list_users, update_user},
    auth::{check_auth, full_detail, google_login, google_signup, login, logout, signup},
    file::{
        delete_uploaded_file, get_signed_url, list_uploaded_files, save_file_meta, secure_stream,
        upload_file,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/auth/check", get(check_auth))
        .route("/auth/full-detail", get(full_detail))
        .route("/auth/google-login", post(google_login))
        .route("/auth/google-signup", post(google_signup))
        // Admin
        .route("/users", get(list_users))
        .route("/users/{id}/update", put(update_user))
        .route("/admin/create-user", post(create_user))
        .route("/admin/import-users", post(import_users))
        // Files
        .route("/upload", post(upload_file))
        .route("/save-file-meta", post(save_file_meta))
        .route("/uploaded-files", get(list_uploaded_files))
        .route("/uploaded-files/{id}/delete", delete(delete_uploaded_file))
        .route("/get-signed-url/{*name}", get(get_signed_url))
        .route("/secure-stream", get(secure_stream))
        .layer(body_limit)
        .layer(cors)
        .with_state(state);

    with_observability(router)
}
