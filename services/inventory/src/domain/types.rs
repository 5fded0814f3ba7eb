use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use campus_domain::issue::IssueStatus;

/// Maximum length of category and sub-category names.
pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategory {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}

/// Writable item attributes, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub fields: ItemFields,
}

impl Item {
    pub fn quantity(&self) -> i32 {
        self.fields.quantity
    }
}

/// An item with its taxonomy resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item: Item,
    pub category: Category,
    pub sub_category: Option<SubCategory>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
}

/// Who asked for stock, copied onto the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: Uuid,
    pub email: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssueRequest {
    pub item_id: i32,
    pub requester: Requester,
    pub quantity: i32,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub id: i32,
    pub item_id: i32,
    pub requester: Requester,
    pub quantity: i32,
    pub status: IssueStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// A request with the item it draws on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequestView {
    pub request: IssueRequest,
    pub item: Item,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Restrict to one requester; `None` lists everyone's.
    pub user_id: Option<Uuid>,
    pub status: Option<IssueStatus>,
}
