use campus_domain::issue::IssueStatus;
use campus_domain::user::UserRole;
use campus_inventory::error::InventoryServiceError;
use campus_inventory::usecase::issue_request::{
    ApproveIssueRequestUseCase, CreateIssueRequestUseCase, DeleteIssueRequestUseCase,
    ListIssueRequestsUseCase, RejectIssueRequestUseCase,
};
use campus_testing::session::sample_session;

use crate::helpers::{MockInventory, item_fields, requester};

fn stocked(quantity: i32) -> (MockInventory, i32) {
    let (inventory, category) = MockInventory::default().with_category("Electronics");
    inventory.with_item(item_fields(category, "DMM-001", quantity))
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pending_request_with_requester_snapshot() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let usecase = CreateIssueRequestUseCase {
        items: inventory.clone(),
        requests: inventory.clone(),
    };

    let view = usecase
        .execute(&student, item, 2, Some("  lab 3 ".into()))
        .await
        .unwrap();

    assert_eq!(view.request.status, IssueStatus::Pending);
    assert_eq!(view.request.requester, requester(&student));
    assert_eq!(view.request.remarks.as_deref(), Some("lab 3"));
    assert_eq!(inventory.stock(item), 5);
}

#[tokio::test]
async fn should_reject_request_quantity_outside_stock() {
    let (inventory, item) = stocked(2);
    let student = sample_session(UserRole::Student);
    let usecase = CreateIssueRequestUseCase {
        items: inventory.clone(),
        requests: inventory.clone(),
    };

    let zero = usecase.execute(&student, item, 0, None).await;
    let too_many = usecase.execute(&student, item, 3, None).await;
    let missing = usecase.execute(&student, 404, 1, None).await;

    assert!(matches!(zero, Err(InventoryServiceError::InvalidQuantity)));
    assert!(matches!(too_many, Err(InventoryServiceError::QuantityExceedsStock)));
    assert!(matches!(missing, Err(InventoryServiceError::ItemNotFound)));
    assert_eq!(inventory.request_count(), 0);
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_requests_for_students() {
    let (inventory, item) = stocked(10);
    let asha = sample_session(UserRole::Student);
    let ravi = sample_session(UserRole::Student);
    let (inventory, first) = inventory.with_request(item, requester(&asha), 1, IssueStatus::Pending);
    let (inventory, _) = inventory.with_request(item, requester(&ravi), 1, IssueStatus::Pending);
    let (inventory, second) =
        inventory.with_request(item, requester(&asha), 2, IssueStatus::Rejected);
    let usecase = ListIssueRequestsUseCase {
        requests: inventory,
    };

    let own = usecase.execute(&asha, None).await.unwrap();
    let everyone = usecase
        .execute(&sample_session(UserRole::Staff), None)
        .await
        .unwrap();

    let ids: Vec<_> = own.iter().map(|v| v.request.id).collect();
    assert_eq!(ids, [second, first]);
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn should_filter_requests_by_status() {
    let (inventory, item) = stocked(10);
    let asha = sample_session(UserRole::Student);
    let (inventory, pending) = inventory.with_request(item, requester(&asha), 1, IssueStatus::Pending);
    let (inventory, _) = inventory.with_request(item, requester(&asha), 1, IssueStatus::Approved);
    let usecase = ListIssueRequestsUseCase {
        requests: inventory,
    };

    let listed = usecase.execute(&asha, Some("pending")).await.unwrap();
    let unknown = usecase.execute(&asha, Some("returned")).await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].request.id, pending);
    assert!(matches!(unknown, Err(InventoryServiceError::InvalidStatus(_))));
}

// ── Approve / reject ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_deduct_stock_on_approval() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&student), 3, IssueStatus::Pending);
    let usecase = ApproveIssueRequestUseCase {
        requests: inventory.clone(),
    };

    let view = usecase
        .execute(&sample_session(UserRole::Staff), id)
        .await
        .unwrap();

    assert_eq!(view.request.status, IssueStatus::Approved);
    assert!(view.request.decided_at.is_some());
    assert_eq!(inventory.stock(item), 2);
}

#[tokio::test]
async fn should_refuse_approval_when_stock_fell_below_request() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, first) = inventory.with_request(item, requester(&student), 4, IssueStatus::Pending);
    let (inventory, second) =
        inventory.with_request(item, requester(&student), 3, IssueStatus::Pending);
    let usecase = ApproveIssueRequestUseCase {
        requests: inventory.clone(),
    };
    let staff = sample_session(UserRole::Staff);

    usecase.execute(&staff, first).await.unwrap();
    let result = usecase.execute(&staff, second).await;

    assert!(matches!(result, Err(InventoryServiceError::InsufficientStock)));
    assert_eq!(result.unwrap_err().to_string(), "Not enough quantity available.");
    assert_eq!(inventory.status(second), Some(IssueStatus::Pending));
    assert_eq!(inventory.stock(item), 1);
}

#[tokio::test]
async fn should_refuse_deciding_a_processed_request() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&student), 1, IssueStatus::Pending);
    let staff = sample_session(UserRole::Admin);

    RejectIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&staff, id)
    .await
    .unwrap();
    let approve = ApproveIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&staff, id)
    .await;
    let reject_again = RejectIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&staff, id)
    .await;

    assert!(matches!(approve, Err(InventoryServiceError::RequestAlreadyProcessed)));
    assert!(matches!(reject_again, Err(InventoryServiceError::RequestAlreadyProcessed)));
    assert_eq!(inventory.stock(item), 5);
}

#[tokio::test]
async fn should_forbid_non_managers_from_deciding() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&student), 1, IssueStatus::Pending);

    let approve = ApproveIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&sample_session(UserRole::Faculty), id)
    .await;
    let reject = RejectIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&student, id)
    .await;

    assert!(matches!(approve, Err(InventoryServiceError::Forbidden)));
    assert!(matches!(reject, Err(InventoryServiceError::Forbidden)));
    assert_eq!(inventory.status(id), Some(IssueStatus::Pending));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_restore_stock_when_approved_request_is_deleted() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&student), 3, IssueStatus::Pending);
    let staff = sample_session(UserRole::Staff);
    ApproveIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&staff, id)
    .await
    .unwrap();
    assert_eq!(inventory.stock(item), 2);

    DeleteIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&staff, id)
    .await
    .unwrap();

    assert_eq!(inventory.stock(item), 5);
    assert_eq!(inventory.request_count(), 0);
}

#[tokio::test]
async fn should_let_owner_withdraw_pending_request_without_stock_change() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&student), 2, IssueStatus::Pending);

    DeleteIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&student, id)
    .await
    .unwrap();

    assert_eq!(inventory.request_count(), 0);
    assert_eq!(inventory.stock(item), 5);
}

#[tokio::test]
async fn should_forbid_owner_deleting_decided_request() {
    let (inventory, item) = stocked(5);
    let student = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&student), 2, IssueStatus::Approved);

    let result = DeleteIssueRequestUseCase {
        requests: inventory.clone(),
    }
    .execute(&student, id)
    .await;

    assert!(matches!(result, Err(InventoryServiceError::Forbidden)));
    assert_eq!(inventory.request_count(), 1);
}

#[tokio::test]
async fn should_forbid_deleting_someone_elses_pending_request() {
    let (inventory, item) = stocked(5);
    let owner = sample_session(UserRole::Student);
    let (inventory, id) = inventory.with_request(item, requester(&owner), 2, IssueStatus::Pending);

    let result = DeleteIssueRequestUseCase {
        requests: inventory,
    }
    .execute(&sample_session(UserRole::Student), id)
    .await;

    assert!(matches!(result, Err(InventoryServiceError::Forbidden)));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_request_delete() {
    let result = DeleteIssueRequestUseCase {
        requests: MockInventory::default(),
    }
    .execute(&sample_session(UserRole::Admin), 12)
    .await;
    assert!(matches!(result, Err(InventoryServiceError::RequestNotFound)));
}
