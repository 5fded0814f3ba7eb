use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use campus_domain::issue::IssueStatus;
use campus_inventory::domain::repository::{
    IssueRequestRepository, ItemRepository, TaxonomyRepository,
};
use campus_inventory::domain::types::{
    Category, IssueRequest, IssueRequestView, Item, ItemFields, ItemFilter, ItemView,
    NewIssueRequest, RequestFilter, Requester, SubCategory,
};
use campus_inventory::error::InventoryServiceError;
use campus_session::session::SessionData;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn item_fields(category_id: i32, serial: &str, quantity: i32) -> ItemFields {
    ItemFields {
        category_id,
        sub_category_id: None,
        name: "Digital Multimeter".into(),
        serial_number: serial.into(),
        cost: Decimal::new(249_900, 2),
        quantity,
        gst_number: "08AAACL1234F1Z5".into(),
        buyer_name: "Central Stores".into(),
        buyer_email: "stores@lnmiit.ac.in".into(),
        purchase_date: Utc::now() - Duration::days(30),
        bill_number: Some("BILL-17".into()),
        remarks: None,
    }
}

pub fn requester(session: &SessionData) -> Requester {
    Requester {
        user_id: session.user_id,
        email: session.email.clone(),
        username: session.username.clone(),
    }
}

// ── MockInventory ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Store {
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
    pub items: Vec<Item>,
    pub requests: Vec<IssueRequest>,
    next_id: i32,
}

impl Store {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn view(&self, item: &Item) -> ItemView {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == item.fields.category_id)
            .cloned()
            .unwrap();
        let sub_category = item
            .fields
            .sub_category_id
            .and_then(|id| self.sub_categories.iter().find(|s| s.id == id).cloned());
        ItemView {
            item: item.clone(),
            category,
            sub_category,
        }
    }

    fn item_mut(&mut self, id: i32) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    fn request_view(&self, request: &IssueRequest) -> IssueRequestView {
        let item = self
            .items
            .iter()
            .find(|i| i.id == request.item_id)
            .cloned()
            .unwrap();
        IssueRequestView {
            request: request.clone(),
            item,
        }
    }
}

/// One in-memory store behind all three repository traits.
#[derive(Clone, Default)]
pub struct MockInventory {
    pub store: Arc<Mutex<Store>>,
}

impl MockInventory {
    pub fn with_category(self, name: &str) -> (Self, i32) {
        let id = {
            let mut store = self.store.lock().unwrap();
            let id = store.next_id();
            store.categories.push(Category {
                id,
                name: name.into(),
            });
            id
        };
        (self, id)
    }

    pub fn with_sub_category(self, category_id: i32, name: &str) -> (Self, i32) {
        let id = {
            let mut store = self.store.lock().unwrap();
            let id = store.next_id();
            store.sub_categories.push(SubCategory {
                id,
                name: name.into(),
                category_id,
            });
            id
        };
        (self, id)
    }

    pub fn with_item(self, fields: ItemFields) -> (Self, i32) {
        let id = {
            let mut store = self.store.lock().unwrap();
            let id = store.next_id();
            store.items.push(Item { id, fields });
            id
        };
        (self, id)
    }

    pub fn with_request(
        self,
        item_id: i32,
        requester: Requester,
        quantity: i32,
        status: IssueStatus,
    ) -> (Self, i32) {
        let id = {
            let mut store = self.store.lock().unwrap();
            let id = store.next_id();
            store.requests.push(IssueRequest {
                id,
                item_id,
                requester,
                quantity,
                status,
                remarks: None,
                created_at: Utc::now() + Duration::seconds(i64::from(id)),
                decided_at: None,
            });
            id
        };
        (self, id)
    }

    pub fn stock(&self, item_id: i32) -> i32 {
        self.store
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.fields.quantity)
            .unwrap()
    }

    pub fn status(&self, request_id: i32) -> Option<IssueStatus> {
        self.store
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == request_id)
            .map(|r| r.status)
    }

    pub fn request_count(&self) -> usize {
        self.store.lock().unwrap().requests.len()
    }
}

impl TaxonomyRepository for MockInventory {
    async fn list_categories(&self) -> Result<Vec<Category>, InventoryServiceError> {
        let mut categories = self.store.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn category_name_exists(&self, name: &str) -> Result<bool, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .categories
            .iter()
            .any(|c| c.name.to_lowercase() == name.to_lowercase()))
    }

    async fn create_category(&self, name: &str) -> Result<Category, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let category = Category {
            id: store.next_id(),
            name: name.into(),
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn list_sub_categories(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<SubCategory>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        let mut subs: Vec<_> = store
            .sub_categories
            .iter()
            .filter(|s| category_id.is_none_or(|c| s.category_id == c))
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subs)
    }

    async fn find_sub_category(
        &self,
        id: i32,
    ) -> Result<Option<SubCategory>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.sub_categories.iter().find(|s| s.id == id).cloned())
    }

    async fn sub_category_name_exists(
        &self,
        category_id: i32,
        name: &str,
    ) -> Result<bool, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.sub_categories.iter().any(|s| {
            s.category_id == category_id && s.name.to_lowercase() == name.to_lowercase()
        }))
    }

    async fn create_sub_category(
        &self,
        category_id: i32,
        name: &str,
    ) -> Result<SubCategory, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let sub_category = SubCategory {
            id: store.next_id(),
            name: name.into(),
            category_id,
        };
        store.sub_categories.push(sub_category.clone());
        Ok(sub_category)
    }
}

impl ItemRepository for MockInventory {
    async fn list(&self, filter: ItemFilter) -> Result<Vec<ItemView>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .items
            .iter()
            .filter(|i| filter.category_id.is_none_or(|c| i.fields.category_id == c))
            .filter(|i| {
                filter
                    .sub_category_id
                    .is_none_or(|s| i.fields.sub_category_id == Some(s))
            })
            .map(|i| store.view(i))
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<ItemView>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.items.iter().find(|i| i.id == id).map(|i| store.view(i)))
    }

    async fn create(&self, fields: &ItemFields) -> Result<ItemView, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let clash = store.items.iter().any(|i| {
            i.fields.category_id == fields.category_id
                && i.fields.sub_category_id == fields.sub_category_id
                && i.fields.serial_number == fields.serial_number
                && i.fields.bill_number == fields.bill_number
        });
        if clash {
            return Err(InventoryServiceError::DuplicateItem);
        }
        let item = Item {
            id: store.next_id(),
            fields: fields.clone(),
        };
        store.items.push(item.clone());
        Ok(store.view(&item))
    }

    async fn update(
        &self,
        id: i32,
        fields: &ItemFields,
    ) -> Result<ItemView, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let item = store.item_mut(id).ok_or(InventoryServiceError::ItemNotFound)?;
        item.fields = fields.clone();
        let item = item.clone();
        Ok(store.view(&item))
    }

    async fn delete(&self, id: i32) -> Result<bool, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let before = store.items.len();
        store.items.retain(|i| i.id != id);
        store.requests.retain(|r| r.item_id != id);
        Ok(store.items.len() != before)
    }

    async fn deduct(&self, id: i32, quantity: i32) -> Result<ItemView, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let item = store.item_mut(id).ok_or(InventoryServiceError::ItemNotFound)?;
        if item.fields.quantity < quantity {
            return Err(InventoryServiceError::IssueExceedsStock);
        }
        item.fields.quantity -= quantity;
        let item = item.clone();
        Ok(store.view(&item))
    }
}

impl IssueRequestRepository for MockInventory {
    async fn create(
        &self,
        request: &NewIssueRequest,
    ) -> Result<IssueRequestView, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let created = IssueRequest {
            id,
            item_id: request.item_id,
            requester: request.requester.clone(),
            quantity: request.quantity,
            status: IssueStatus::Pending,
            remarks: request.remarks.clone(),
            created_at: Utc::now() + Duration::seconds(i64::from(id)),
            decided_at: None,
        };
        store.requests.push(created.clone());
        Ok(store.request_view(&created))
    }

    async fn find(&self, id: i32) -> Result<Option<IssueRequestView>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .requests
            .iter()
            .find(|r| r.id == id)
            .map(|r| store.request_view(r)))
    }

    async fn list(
        &self,
        filter: RequestFilter,
    ) -> Result<Vec<IssueRequestView>, InventoryServiceError> {
        let store = self.store.lock().unwrap();
        let mut requests: Vec<_> = store
            .requests
            .iter()
            .filter(|r| filter.user_id.is_none_or(|u| r.requester.user_id == u))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests.iter().map(|r| store.request_view(r)).collect())
    }

    async fn approve(&self, id: i32) -> Result<IssueRequestView, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let request = store
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(InventoryServiceError::RequestNotFound)?;
        if !request.status.is_pending() {
            return Err(InventoryServiceError::RequestAlreadyProcessed);
        }
        let item = store
            .item_mut(request.item_id)
            .ok_or(InventoryServiceError::ItemNotFound)?;
        if item.fields.quantity < request.quantity {
            return Err(InventoryServiceError::InsufficientStock);
        }
        item.fields.quantity -= request.quantity;
        let slot = store.requests.iter_mut().find(|r| r.id == id).unwrap();
        slot.status = IssueStatus::Approved;
        slot.decided_at = Some(Utc::now());
        let approved = slot.clone();
        Ok(store.request_view(&approved))
    }

    async fn reject(&self, id: i32) -> Result<IssueRequestView, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let slot = store
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(InventoryServiceError::RequestNotFound)?;
        if !slot.status.is_pending() {
            return Err(InventoryServiceError::RequestAlreadyProcessed);
        }
        slot.status = IssueStatus::Rejected;
        slot.decided_at = Some(Utc::now());
        let rejected = slot.clone();
        Ok(store.request_view(&rejected))
    }

    async fn withdraw(&self, id: i32, expected: IssueStatus) -> Result<bool, InventoryServiceError> {
        let mut store = self.store.lock().unwrap();
        let Some(request) = store
            .requests
            .iter()
            .find(|r| r.id == id && r.status == expected)
            .cloned()
        else {
            return Ok(false);
        };
        store.requests.retain(|r| r.id != id);
        let reserved = expected.reserved_quantity(request.quantity);
        if let Some(item) = store.item_mut(request.item_id) {
            item.fields.quantity += reserved;
        }
        Ok(true)
    }
}
