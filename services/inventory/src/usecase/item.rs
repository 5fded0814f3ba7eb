use rust_decimal::Decimal;

use campus_domain::email::{looks_like_email, normalize_email};
use campus_session::session::SessionData;

use crate::domain::repository::{ItemRepository, TaxonomyRepository};
use crate::domain::types::{ItemFields, ItemFilter, ItemView};
use crate::error::InventoryServiceError;
use crate::usecase::require_manager;

const MAX_TEXT_LEN: usize = 100;
const MAX_GST_LEN: usize = 15;
const MAX_BILL_LEN: usize = 50;

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct ListItemsUseCase<I: ItemRepository> {
    pub items: I,
}

impl<I: ItemRepository> ListItemsUseCase<I> {
    pub async fn execute(&self, filter: ItemFilter) -> Result<Vec<ItemView>, InventoryServiceError> {
        self.items.list(filter).await
    }
}

pub struct GetItemUseCase<I: ItemRepository> {
    pub items: I,
}

impl<I: ItemRepository> GetItemUseCase<I> {
    pub async fn execute(&self, id: i32) -> Result<ItemView, InventoryServiceError> {
        self.items
            .find(id)
            .await?
            .ok_or(InventoryServiceError::ItemNotFound)
    }
}

// ── Writes ───────────────────────────────────────────────────────────────────

pub struct CreateItemUseCase<I: ItemRepository, T: TaxonomyRepository> {
    pub items: I,
    pub taxonomy: T,
}

impl<I: ItemRepository, T: TaxonomyRepository> CreateItemUseCase<I, T> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        fields: ItemFields,
    ) -> Result<ItemView, InventoryServiceError> {
        require_manager(caller)?;
        let fields = validate_item(fields)?;
        check_taxonomy(&self.taxonomy, &fields).await?;
        let view = self.items.create(&fields).await?;
        tracing::info!(item_id = view.item.id, quantity = view.item.quantity(), "item created");
        Ok(view)
    }
}

pub struct UpdateItemUseCase<I: ItemRepository, T: TaxonomyRepository> {
    pub items: I,
    pub taxonomy: T,
}

impl<I: ItemRepository, T: TaxonomyRepository> UpdateItemUseCase<I, T> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        id: i32,
        fields: ItemFields,
    ) -> Result<ItemView, InventoryServiceError> {
        require_manager(caller)?;
        if self.items.find(id).await?.is_none() {
            return Err(InventoryServiceError::ItemNotFound);
        }
        let fields = validate_item(fields)?;
        check_taxonomy(&self.taxonomy, &fields).await?;
        self.items.update(id, &fields).await
    }
}

pub struct DeleteItemUseCase<I: ItemRepository> {
    pub items: I,
}

impl<I: ItemRepository> DeleteItemUseCase<I> {
    pub async fn execute(&self, caller: &SessionData, id: i32) -> Result<(), InventoryServiceError> {
        require_manager(caller)?;
        if !self.items.delete(id).await? {
            return Err(InventoryServiceError::ItemNotFound);
        }
        tracing::info!(item_id = id, "item deleted");
        Ok(())
    }
}

/// Hand stock out directly, without an issue request.
pub struct IssueItemUseCase<I: ItemRepository> {
    pub items: I,
}

impl<I: ItemRepository> IssueItemUseCase<I> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        id: i32,
        quantity: i32,
    ) -> Result<ItemView, InventoryServiceError> {
        require_manager(caller)?;
        if quantity <= 0 {
            return Err(InventoryServiceError::InvalidQuantity);
        }
        let view = self.items.deduct(id, quantity).await?;
        tracing::info!(
            item_id = id,
            quantity,
            remaining = view.item.quantity(),
            issued_by = %caller.user_id,
            "item issued"
        );
        Ok(view)
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Trim text fields and enforce the field rules. Empty optional text becomes `None`.
pub fn validate_item(fields: ItemFields) -> Result<ItemFields, InventoryServiceError> {
    if fields.cost <= Decimal::ZERO {
        return Err(invalid("cost must be greater than 0"));
    }
    if fields.cost.normalize().scale() > 2 {
        return Err(invalid("cost must have at most 2 decimal places"));
    }
    if fields.quantity < 0 {
        return Err(invalid("quantity must not be negative"));
    }

    let buyer_email = normalize_email(&fields.buyer_email);
    if !looks_like_email(&buyer_email) {
        return Err(invalid("buyer_email must be a valid email address"));
    }

    let bill_number = optional_text(fields.bill_number);
    if bill_number
        .as_deref()
        .is_some_and(|b| b.chars().count() > MAX_BILL_LEN)
    {
        return Err(invalid(&format!(
            "bill_number must be at most {MAX_BILL_LEN} characters"
        )));
    }

    Ok(ItemFields {
        name: required_text("name", &fields.name, MAX_TEXT_LEN)?,
        serial_number: required_text("serial_number", &fields.serial_number, MAX_TEXT_LEN)?,
        gst_number: required_text("gst_number", &fields.gst_number, MAX_GST_LEN)?,
        buyer_name: required_text("buyer_name", &fields.buyer_name, MAX_TEXT_LEN)?,
        buyer_email,
        bill_number,
        remarks: optional_text(fields.remarks),
        ..fields
    })
}

async fn check_taxonomy<T: TaxonomyRepository>(
    taxonomy: &T,
    fields: &ItemFields,
) -> Result<(), InventoryServiceError> {
    if taxonomy.find_category(fields.category_id).await?.is_none() {
        return Err(InventoryServiceError::InvalidCategory);
    }
    if let Some(sub_category_id) = fields.sub_category_id {
        let sub_category = taxonomy
            .find_sub_category(sub_category_id)
            .await?
            .ok_or(InventoryServiceError::InvalidSubCategory)?;
        if sub_category.category_id != fields.category_id {
            return Err(InventoryServiceError::SubCategoryMismatch);
        }
    }
    Ok(())
}

fn required_text(field: &str, raw: &str, max: usize) -> Result<String, InventoryServiceError> {
    let value = raw.trim();
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(invalid(&format!(
            "{field} must be between 1 and {max} characters"
        )));
    }
    Ok(value.to_owned())
}

fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn invalid(message: &str) -> InventoryServiceError {
    InventoryServiceError::Validation(message.to_owned())
}
