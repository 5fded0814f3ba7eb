use campus_domain::issue::IssueStatus;
use campus_session::session::SessionData;

use crate::domain::repository::{IssueRequestRepository, ItemRepository};
use crate::domain::types::{IssueRequestView, NewIssueRequest, RequestFilter, Requester};
use crate::error::InventoryServiceError;
use crate::usecase::require_manager;

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateIssueRequestUseCase<I: ItemRepository, R: IssueRequestRepository> {
    pub items: I,
    pub requests: R,
}

impl<I: ItemRepository, R: IssueRequestRepository> CreateIssueRequestUseCase<I, R> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        item_id: i32,
        quantity: i32,
        remarks: Option<String>,
    ) -> Result<IssueRequestView, InventoryServiceError> {
        if quantity <= 0 {
            return Err(InventoryServiceError::InvalidQuantity);
        }
        let item = self
            .items
            .find(item_id)
            .await?
            .ok_or(InventoryServiceError::ItemNotFound)?;
        if quantity > item.item.quantity() {
            return Err(InventoryServiceError::QuantityExceedsStock);
        }

        let request = NewIssueRequest {
            item_id,
            requester: Requester {
                user_id: caller.user_id,
                email: caller.email.clone(),
                username: caller.username.clone(),
            },
            quantity,
            remarks: remarks.map(|r| r.trim().to_owned()).filter(|r| !r.is_empty()),
        };
        let view = self.requests.create(&request).await?;
        tracing::info!(
            request_id = view.request.id,
            item_id,
            quantity,
            user_id = %caller.user_id,
            "issue request created"
        );
        Ok(view)
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListIssueRequestsUseCase<R: IssueRequestRepository> {
    pub requests: R,
}

impl<R: IssueRequestRepository> ListIssueRequestsUseCase<R> {
    /// Managers see every request; everyone else only their own.
    pub async fn execute(
        &self,
        caller: &SessionData,
        status: Option<&str>,
    ) -> Result<Vec<IssueRequestView>, InventoryServiceError> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<IssueStatus>()?),
            None => None,
        };
        let user_id = (!caller.role.can_manage_inventory()).then_some(caller.user_id);
        self.requests.list(RequestFilter { user_id, status }).await
    }
}

// ── Decide ───────────────────────────────────────────────────────────────────

pub struct ApproveIssueRequestUseCase<R: IssueRequestRepository> {
    pub requests: R,
}

impl<R: IssueRequestRepository> ApproveIssueRequestUseCase<R> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        id: i32,
    ) -> Result<IssueRequestView, InventoryServiceError> {
        require_manager(caller)?;
        let view = self.requests.approve(id).await?;
        tracing::info!(
            request_id = id,
            item_id = view.item.id,
            quantity = view.request.quantity,
            remaining = view.item.quantity(),
            approved_by = %caller.user_id,
            "issue request approved"
        );
        Ok(view)
    }
}

pub struct RejectIssueRequestUseCase<R: IssueRequestRepository> {
    pub requests: R,
}

impl<R: IssueRequestRepository> RejectIssueRequestUseCase<R> {
    pub async fn execute(
        &self,
        caller: &SessionData,
        id: i32,
    ) -> Result<IssueRequestView, InventoryServiceError> {
        require_manager(caller)?;
        let view = self.requests.reject(id).await?;
        tracing::info!(request_id = id, rejected_by = %caller.user_id, "issue request rejected");
        Ok(view)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteIssueRequestUseCase<R: IssueRequestRepository> {
    pub requests: R,
}

impl<R: IssueRequestRepository> DeleteIssueRequestUseCase<R> {
    /// Owners may withdraw their pending requests. Managers may delete any
    /// request; deleting an approved one puts its quantity back in stock.
    pub async fn execute(&self, caller: &SessionData, id: i32) -> Result<(), InventoryServiceError> {
        let view = self
            .requests
            .find(id)
            .await?
            .ok_or(InventoryServiceError::RequestNotFound)?;
        let request = &view.request;

        let is_owner = request.requester.user_id == caller.user_id;
        let allowed = caller.role.can_manage_inventory() || (is_owner && request.status.is_pending());
        if !allowed {
            return Err(InventoryServiceError::Forbidden);
        }

        if !self.requests.withdraw(id, request.status).await? {
            return Err(InventoryServiceError::RequestAlreadyProcessed);
        }

        let restored = request.status.reserved_quantity(request.quantity);
        if restored > 0 {
            tracing::info!(
                request_id = id,
                item_id = request.item_id,
                restored,
                "approved issue request deleted, stock restored"
            );
        } else {
            tracing::info!(request_id = id, status = %request.status, "issue request deleted");
        }
        Ok(())
    }
}
