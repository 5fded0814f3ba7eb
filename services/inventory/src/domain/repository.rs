#![allow(async_fn_in_trait)]

use campus_domain::issue::IssueStatus;

use crate::domain::types::{
    Category, IssueRequestView, ItemFields, ItemFilter, ItemView, NewIssueRequest,
    RequestFilter, SubCategory,
};
use crate::error::InventoryServiceError;

/// Categories and sub-categories.
pub trait TaxonomyRepository: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, InventoryServiceError>;

    async fn find_category(&self, id: i32) -> Result<Option<Category>, InventoryServiceError>;

    /// Case-insensitive name lookup.
    async fn category_name_exists(&self, name: &str) -> Result<bool, InventoryServiceError>;

    /// A racing duplicate surfaces as `CategoryExists`.
    async fn create_category(&self, name: &str) -> Result<Category, InventoryServiceError>;

    /// Sub-categories ordered by name, restricted to `category_id` when given.
    async fn list_sub_categories(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<SubCategory>, InventoryServiceError>;

    async fn find_sub_category(
        &self,
        id: i32,
    ) -> Result<Option<SubCategory>, InventoryServiceError>;

    /// Case-insensitive name lookup within one category.
    async fn sub_category_name_exists(
        &self,
        category_id: i32,
        name: &str,
    ) -> Result<bool, InventoryServiceError>;

    async fn create_sub_category(
        &self,
        category_id: i32,
        name: &str,
    ) -> Result<SubCategory, InventoryServiceError>;
}

/// Stocked items.
pub trait ItemRepository: Send + Sync {
    async fn list(&self, filter: ItemFilter) -> Result<Vec<ItemView>, InventoryServiceError>;

    async fn find(&self, id: i32) -> Result<Option<ItemView>, InventoryServiceError>;

    /// A unique-group clash is `DuplicateItem`.
    async fn create(&self, fields: &ItemFields) -> Result<ItemView, InventoryServiceError>;

    /// Unknown id is `ItemNotFound`; a unique-group clash is `DuplicateItem`.
    async fn update(&self, id: i32, fields: &ItemFields)
    -> Result<ItemView, InventoryServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, InventoryServiceError>;

    /// Deduct `quantity` units only if that many are in stock.
    ///
    /// Unknown id is `ItemNotFound`; short stock is `IssueExceedsStock`.
    async fn deduct(&self, id: i32, quantity: i32) -> Result<ItemView, InventoryServiceError>;
}

/// Issue requests and their stock effects.
pub trait IssueRequestRepository: Send + Sync {
    async fn create(
        &self,
        request: &NewIssueRequest,
    ) -> Result<IssueRequestView, InventoryServiceError>;

    async fn find(&self, id: i32) -> Result<Option<IssueRequestView>, InventoryServiceError>;

    /// Newest first.
    async fn list(
        &self,
        filter: RequestFilter,
    ) -> Result<Vec<IssueRequestView>, InventoryServiceError>;

    /// Move a pending request to approved and deduct its quantity, atomically.
    ///
    /// A non-pending request is `RequestAlreadyProcessed`; short stock is
    /// `InsufficientStock` and leaves the request pending.
    async fn approve(&self, id: i32) -> Result<IssueRequestView, InventoryServiceError>;

    /// Move a pending request to rejected. Stock is untouched.
    async fn reject(&self, id: i32) -> Result<IssueRequestView, InventoryServiceError>;

    /// Delete the request if it is still in `expected` state, returning any
    /// reserved quantity to the item. Returns `false` if the state moved on.
    async fn withdraw(
        &self,
        id: i32,
        expected: IssueStatus,
    ) -> Result<bool, InventoryServiceError>;
}
