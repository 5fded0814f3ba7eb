use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use campus_session::identity::CurrentUser;

use crate::domain::types::{Category, SubCategory};
use crate::error::InventoryServiceError;
use crate::state::AppState;
use crate::usecase::taxonomy::{
    CreateCategoryUseCase, CreateSubCategoryUseCase, ListCategoriesUseCase,
    ListSubCategoriesUseCase,
};

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Serialize)]
pub struct SubCategoryResponse {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}

impl From<SubCategory> for SubCategoryResponse {
    fn from(sub_category: SubCategory) -> Self {
        Self {
            id: sub_category.id,
            name: sub_category.name,
            category_id: sub_category.category_id,
        }
    }
}

// ── /categories ──────────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Vec<CategoryResponse>>, InventoryServiceError> {
    let usecase = ListCategoriesUseCase {
        taxonomy: state.taxonomy_repo(),
    };
    let categories = usecase.execute().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

pub async fn create_category(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, InventoryServiceError> {
    let usecase = CreateCategoryUseCase {
        taxonomy: state.taxonomy_repo(),
    };
    let category = usecase.execute(&current.data, &body.name).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

// ── /subcategories ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubCategoryQuery {
    pub category_id: Option<i32>,
}

pub async fn list_sub_categories(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(query): Query<SubCategoryQuery>,
) -> Result<Json<Vec<SubCategoryResponse>>, InventoryServiceError> {
    let usecase = ListSubCategoriesUseCase {
        taxonomy: state.taxonomy_repo(),
    };
    let sub_categories = usecase.execute(query.category_id).await?;
    Ok(Json(sub_categories.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct CreateSubCategoryRequest {
    pub name: String,
    pub category_id: i32,
}

pub async fn create_sub_category(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateSubCategoryRequest>,
) -> Result<impl IntoResponse, InventoryServiceError> {
    let usecase = CreateSubCategoryUseCase {
        taxonomy: state.taxonomy_repo(),
    };
    let sub_category = usecase
        .execute(&current.data, body.category_id, &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(SubCategoryResponse::from(sub_category))))
}
