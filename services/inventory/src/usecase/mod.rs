pub mod issue_request;
pub mod item;
pub mod taxonomy;

use campus_session::session::SessionData;

use crate::error::InventoryServiceError;

/// Inventory writes and request decisions are limited to admin and staff.
pub fn require_manager(caller: &SessionData) -> Result<(), InventoryServiceError> {
    if caller.role.can_manage_inventory() {
        Ok(())
    } else {
        Err(InventoryServiceError::Forbidden)
    }
}
