use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use campus_session::identity::CurrentUser;

use crate::domain::types::{Item, ItemFields, ItemFilter, ItemView};
use crate::error::InventoryServiceError;
use crate::handlers::taxonomy::{CategoryResponse, SubCategoryResponse};
use crate::state::AppState;
use crate::usecase::item::{
    CreateItemUseCase, DeleteItemUseCase, GetItemUseCase, IssueItemUseCase, ListItemsUseCase,
    UpdateItemUseCase,
};

/// Item attributes without the taxonomy, as embedded in issue requests.
#[derive(Serialize)]
pub struct ItemSummary {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub quantity: i32,
}

impl From<Item> for ItemSummary {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.fields.name,
            serial_number: item.fields.serial_number,
            quantity: item.fields.quantity,
        }
    }
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: i32,
    pub category: CategoryResponse,
    pub sub_category: Option<SubCategoryResponse>,
    pub name: String,
    pub serial_number: String,
    pub cost: Decimal,
    pub quantity: i32,
    pub gst_number: String,
    pub buyer_name: String,
    pub buyer_email: String,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub purchase_date: DateTime<Utc>,
    pub bill_number: Option<String>,
    pub remarks: Option<String>,
}

impl From<ItemView> for ItemResponse {
    fn from(view: ItemView) -> Self {
        let ItemView {
            item,
            category,
            sub_category,
        } = view;
        let fields = item.fields;
        Self {
            id: item.id,
            category: category.into(),
            sub_category: sub_category.map(Into::into),
            name: fields.name,
            serial_number: fields.serial_number,
            cost: fields.cost,
            quantity: fields.quantity,
            gst_number: fields.gst_number,
            buyer_name: fields.buyer_name,
            buyer_email: fields.buyer_email,
            purchase_date: fields.purchase_date,
            bill_number: fields.bill_number,
            remarks: fields.remarks,
        }
    }
}

#[derive(Deserialize)]
pub struct ItemRequest {
    pub category_id: i32,
    pub sub_category_id: Option<i32>,
    pub name: String,
    pub serial_number: String,
    pub cost: Decimal,
    pub quantity: i32,
    pub gst_number: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub purchase_date: DateTime<Utc>,
    pub bill_number: Option<String>,
    pub remarks: Option<String>,
}

impl From<ItemRequest> for ItemFields {
    fn from(body: ItemRequest) -> Self {
        Self {
            category_id: body.category_id,
            sub_category_id: body.sub_category_id,
            name: body.name,
            serial_number: body.serial_number,
            cost: body.cost,
            quantity: body.quantity,
            gst_number: body.gst_number,
            buyer_name: body.buyer_name,
            buyer_email: body.buyer_email,
            purchase_date: body.purchase_date,
            bill_number: body.bill_number,
            remarks: body.remarks,
        }
    }
}

// ── GET /items ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ItemQuery {
    pub category: Option<i32>,
    pub subcategory: Option<i32>,
}

pub async fn list_items(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<ItemResponse>>, InventoryServiceError> {
    let usecase = ListItemsUseCase {
        items: state.item_repo(),
    };
    let filter = ItemFilter {
        category_id: query.category,
        sub_category_id: query.subcategory,
    };
    let items = usecase.execute(filter).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

// ── POST /items ──────────────────────────────────────────────────────────────

pub async fn create_item(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<ItemRequest>,
) -> Result<impl IntoResponse, InventoryServiceError> {
    let usecase = CreateItemUseCase {
        items: state.item_repo(),
        taxonomy: state.taxonomy_repo(),
    };
    let item = usecase.execute(&current.data, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

// ── /items/{id} ──────────────────────────────────────────────────────────────

pub async fn get_item(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse>, InventoryServiceError> {
    let usecase = GetItemUseCase {
        items: state.item_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

pub async fn update_item(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<ItemRequest>,
) -> Result<Json<ItemResponse>, InventoryServiceError> {
    let usecase = UpdateItemUseCase {
        items: state.item_repo(),
        taxonomy: state.taxonomy_repo(),
    };
    let item = usecase.execute(&current.data, id, body.into()).await?;
    Ok(Json(item.into()))
}

pub async fn delete_item(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, InventoryServiceError> {
    let usecase = DeleteItemUseCase {
        items: state.item_repo(),
    };
    usecase.execute(&current.data, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /items/{id}/issue ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueItemRequest {
    pub quantity: i32,
}

pub async fn issue_item(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<IssueItemRequest>,
) -> Result<Json<ItemResponse>, InventoryServiceError> {
    let usecase = IssueItemUseCase {
        items: state.item_repo(),
    };
    let item = usecase.execute(&current.data, id, body.quantity).await?;
    Ok(Json(item.into()))
}
