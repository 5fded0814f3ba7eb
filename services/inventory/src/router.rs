use axum::{
    Router,
    routing::{delete, get, post},
};

use campus_core::health::{healthz, readyz};
use campus_core::middleware::{cors_layer, with_observability};

use crate::handlers::{
    issue_request::{
        approve_issue_request, create_issue_request, delete_issue_request, list_issue_requests,
        reject_issue_request,
    },
    item::{create_item, delete_item, get_item, issue_item, list_items, update_item},
    taxonomy::{create_category, create_sub_category, list_categories, list_sub_categories},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Taxonomy
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/subcategories",
            get(list_sub_categories).post(create_sub_category),
        )
        // Items
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/items/{id}/issue", post(issue_item))
        // Issue requests
        .route(
            "/issue-requests",
            get(list_issue_requests).post(create_issue_request),
        )
        .route("/issue-requests/{id}", delete(delete_issue_request))
        .route("/issue-requests/{id}/approve", post(approve_issue_request))
        .route("/issue-requests/{id}/reject", post(reject_issue_request))
        .layer(cors)
        .with_state(state);

    with_observability(router)
}
