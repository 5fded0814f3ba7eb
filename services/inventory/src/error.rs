use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use campus_core::error::{ApiError, api_response};
use campus_domain::issue::UnknownStatus;

/// Inventory service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum InventoryServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Category already exists.")]
    CategoryExists,
    #[error("Subcategory already exists for this category.")]
    SubCategoryExists,
    #[error("Invalid category_id")]
    InvalidCategory,
    #[error("Invalid sub_category_id")]
    InvalidSubCategory,
    #[error("Sub-category does not belong to the selected category.")]
    SubCategoryMismatch,
    #[error("Item with same serial and bill number already exists.")]
    DuplicateItem,
    #[error("Quantity must be greater than 0.")]
    InvalidQuantity,
    #[error("Requested quantity exceeds available.")]
    QuantityExceedsStock,
    #[error("You can't issue more than available quantity.")]
    IssueExceedsStock,
    #[error("Not enough quantity available.")]
    InsufficientStock,
    #[error("Request already processed.")]
    RequestAlreadyProcessed,
    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
    #[error("Item not found")]
    ItemNotFound,
    #[error("Issue request not found")]
    RequestNotFound,
    #[error("Permission denied")]
    Forbidden,
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError for InventoryServiceError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::CategoryExists
            | Self::SubCategoryExists
            | Self::InvalidCategory
            | Self::InvalidSubCategory
            | Self::SubCategoryMismatch
            | Self::DuplicateItem
            | Self::InvalidQuantity
            | Self::QuantityExceedsStock
            | Self::IssueExceedsStock
            | Self::InsufficientStock
            | Self::RequestAlreadyProcessed
            | Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ItemNotFound | Self::RequestNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::CategoryExists => "CATEGORY_EXISTS",
            Self::SubCategoryExists => "SUB_CATEGORY_EXISTS",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidSubCategory => "INVALID_SUB_CATEGORY",
            Self::SubCategoryMismatch => "SUB_CATEGORY_MISMATCH",
            Self::DuplicateItem => "DUPLICATE_ITEM",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::QuantityExceedsStock => "QUANTITY_EXCEEDS_STOCK",
            Self::IssueExceedsStock => "ISSUE_EXCEEDS_STOCK",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::RequestAlreadyProcessed => "REQUEST_ALREADY_PROCESSED",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::RequestNotFound => "REQUEST_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for InventoryServiceError {
    fn into_response(self) -> Response {
        api_response(&self)
    }
}
