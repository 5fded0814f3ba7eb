use std::collections::HashMap;

use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionError, TransactionTrait,
    sea_query::{Expr, Func},
};

use campus_core::sea_ext::is_unique_violation;
use campus_domain::issue::IssueStatus;
use campus_inventory_schema::{categories, issue_requests, items, sub_categories};

use crate::domain::repository::{IssueRequestRepository, ItemRepository, TaxonomyRepository};
use crate::domain::types::{
    Category, IssueRequest, IssueRequestView, Item, ItemFields, ItemFilter, ItemView,
    NewIssueRequest, RequestFilter, Requester, SubCategory,
};
use crate::error::InventoryServiceError;

// ── Taxonomy repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTaxonomyRepository {
    pub db: DatabaseConnection,
}

impl TaxonomyRepository for DbTaxonomyRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, InventoryServiceError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>, InventoryServiceError> {
        let model = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find category")?;
        Ok(model.map(category_from_model))
    }

    async fn category_name_exists(&self, name: &str) -> Result<bool, InventoryServiceError> {
        let model = categories::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await
            .context("find category by name")?;
        Ok(model.is_some())
    }

    async fn create_category(&self, name: &str) -> Result<Category, InventoryServiceError> {
        let result = categories::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(category_from_model(model)),
            Err(err) if is_unique_violation(&err) => Err(InventoryServiceError::CategoryExists),
            Err(err) => Err(anyhow::Error::new(err).context("create category").into()),
        }
    }

    async fn list_sub_categories(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<SubCategory>, InventoryServiceError> {
        let mut query = sub_categories::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(sub_categories::Column::CategoryId.eq(category_id));
        }
        let models = query
            .order_by_asc(sub_categories::Column::Name)
            .all(&self.db)
            .await
            .context("list sub-categories")?;
        Ok(models.into_iter().map(sub_category_from_model).collect())
    }

    async fn find_sub_category(
        &self,
        id: i32,
    ) -> Result<Option<SubCategory>, InventoryServiceError> {
        let model = sub_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find sub-category")?;
        Ok(model.map(sub_category_from_model))
    }

    async fn sub_category_name_exists(
        &self,
        category_id: i32,
        name: &str,
    ) -> Result<bool, InventoryServiceError> {
        let model = sub_categories::Entity::find()
            .filter(sub_categories::Column::CategoryId.eq(category_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(sub_categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await
            .context("find sub-category by name")?;
        Ok(model.is_some())
    }

    async fn create_sub_category(
        &self,
        category_id: i32,
        name: &str,
    ) -> Result<SubCategory, InventoryServiceError> {
        let result = sub_categories::ActiveModel {
            name: Set(name.to_owned()),
            category_id: Set(category_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(sub_category_from_model(model)),
            Err(err) if is_unique_violation(&err) => Err(InventoryServiceError::SubCategoryExists),
            Err(err) => Err(anyhow::Error::new(err).context("create sub-category").into()),
        }
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
    }
}

fn sub_category_from_model(model: sub_categories::Model) -> SubCategory {
    SubCategory {
        id: model.id,
        name: model.name,
        category_id: model.category_id,
    }
}

// ── Item repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbItemRepository {
    pub db: DatabaseConnection,
}

impl ItemRepository for DbItemRepository {
    async fn list(&self, filter: ItemFilter) -> Result<Vec<ItemView>, InventoryServiceError> {
        let mut query = items::Entity::find();
        if let Some(category_id) = filter.category_id {
            query = query.filter(items::Column::CategoryId.eq(category_id));
        }
        if let Some(sub_category_id) = filter.sub_category_id {
            query = query.filter(items::Column::SubCategoryId.eq(sub_category_id));
        }
        let models = query
            .order_by_asc(items::Column::Id)
            .all(&self.db)
            .await
            .context("list items")?;
        item_views(&self.db, models).await
    }

    async fn find(&self, id: i32) -> Result<Option<ItemView>, InventoryServiceError> {
        find_item_view(&self.db, id).await
    }

    async fn create(&self, fields: &ItemFields) -> Result<ItemView, InventoryServiceError> {
        let result = item_active_model(fields).insert(&self.db).await;
        match result {
            Ok(model) => single_view(&self.db, model).await,
            Err(err) => Err(item_write_error(err, "create item")),
        }
    }

    async fn update(
        &self,
        id: i32,
        fields: &ItemFields,
    ) -> Result<ItemView, InventoryServiceError> {
        let mut active = item_active_model(fields);
        active.id = Set(id);
        match active.update(&self.db).await {
            Ok(model) => single_view(&self.db, model).await,
            Err(DbErr::RecordNotUpdated) => Err(InventoryServiceError::ItemNotFound),
            Err(err) => Err(item_write_error(err, "update item")),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, InventoryServiceError> {
        let result = items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete item")?;
        Ok(result.rows_affected > 0)
    }

    async fn deduct(&self, id: i32, quantity: i32) -> Result<ItemView, InventoryServiceError> {
        let rows = take_stock(&self.db, id, quantity).await?;
        if rows == 0 {
            return match find_item_view(&self.db, id).await? {
                Some(_) => Err(InventoryServiceError::IssueExceedsStock),
                None => Err(InventoryServiceError::ItemNotFound),
            };
        }
        find_item_view(&self.db, id)
            .await?
            .ok_or(InventoryServiceError::ItemNotFound)
    }
}

/// `quantity = quantity - n WHERE quantity >= n`. Returns the affected row count.
async fn take_stock<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
    quantity: i32,
) -> Result<u64, InventoryServiceError> {
    let result = items::Entity::update_many()
        .col_expr(
            items::Column::Quantity,
            Expr::col(items::Column::Quantity).sub(quantity),
        )
        .filter(items::Column::Id.eq(item_id))
        .filter(items::Column::Quantity.gte(quantity))
        .exec(conn)
        .await
        .context("deduct item stock")?;
    Ok(result.rows_affected)
}

async fn return_stock<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
    quantity: i32,
) -> Result<(), InventoryServiceError> {
    items::Entity::update_many()
        .col_expr(
            items::Column::Quantity,
            Expr::col(items::Column::Quantity).add(quantity),
        )
        .filter(items::Column::Id.eq(item_id))
        .exec(conn)
        .await
        .context("restore item stock")?;
    Ok(())
}

fn item_write_error(err: DbErr, action: &'static str) -> InventoryServiceError {
    if is_unique_violation(&err) {
        InventoryServiceError::DuplicateItem
    } else {
        anyhow::Error::new(err).context(action).into()
    }
}

fn item_active_model(fields: &ItemFields) -> items::ActiveModel {
    items::ActiveModel {
        category_id: Set(fields.category_id),
        sub_category_id: Set(fields.sub_category_id),
        name: Set(fields.name.clone()),
        serial_number: Set(fields.serial_number.clone()),
        cost: Set(fields.cost),
        quantity: Set(fields.quantity),
        gst_number: Set(fields.gst_number.clone()),
        buyer_name: Set(fields.buyer_name.clone()),
        buyer_email: Set(fields.buyer_email.clone()),
        purchase_date: Set(fields.purchase_date),
        bill_number: Set(fields.bill_number.clone()),
        remarks: Set(fields.remarks.clone()),
        ..Default::default()
    }
}

fn item_from_model(model: items::Model) -> Item {
    Item {
        id: model.id,
        fields: ItemFields {
            category_id: model.category_id,
            sub_category_id: model.sub_category_id,
            name: model.name,
            serial_number: model.serial_number,
            cost: model.cost,
            quantity: model.quantity,
            gst_number: model.gst_number,
            buyer_name: model.buyer_name,
            buyer_email: model.buyer_email,
            purchase_date: model.purchase_date,
            bill_number: model.bill_number,
            remarks: model.remarks,
        },
    }
}

async fn find_item_view<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<ItemView>, InventoryServiceError> {
    let model = items::Entity::find_by_id(id)
        .one(conn)
        .await
        .context("find item")?;
    match model {
        Some(model) => Ok(Some(single_view(conn, model).await?)),
        None => Ok(None),
    }
}

async fn single_view<C: ConnectionTrait>(
    conn: &C,
    model: items::Model,
) -> Result<ItemView, InventoryServiceError> {
    item_views(conn, vec![model])
        .await?
        .pop()
        .ok_or_else(|| anyhow!("item view vanished").into())
}

/// Attach category and sub-category to each item with two lookups in total.
async fn item_views<C: ConnectionTrait>(
    conn: &C,
    models: Vec<items::Model>,
) -> Result<Vec<ItemView>, InventoryServiceError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let category_ids: Vec<i32> = models.iter().map(|m| m.category_id).collect();
    let sub_category_ids: Vec<i32> = models.iter().filter_map(|m| m.sub_category_id).collect();

    let categories: HashMap<i32, Category> = categories::Entity::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .all(conn)
        .await
        .context("load item categories")?
        .into_iter()
        .map(|m| (m.id, category_from_model(m)))
        .collect();
    let sub_categories: HashMap<i32, SubCategory> = if sub_category_ids.is_empty() {
        HashMap::new()
    } else {
        sub_categories::Entity::find()
            .filter(sub_categories::Column::Id.is_in(sub_category_ids))
            .all(conn)
            .await
            .context("load item sub-categories")?
            .into_iter()
            .map(|m| (m.id, sub_category_from_model(m)))
            .collect()
    };

    models
        .into_iter()
        .map(|model| {
            let category = categories
                .get(&model.category_id)
                .cloned()
                .with_context(|| format!("category {} of item {}", model.category_id, model.id))?;
            let sub_category = model
                .sub_category_id
                .and_then(|id| sub_categories.get(&id).cloned());
            Ok(ItemView {
                item: item_from_model(model),
                category,
                sub_category,
            })
        })
        .collect()
}

// ── Issue request repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIssueRequestRepository {
    pub db: DatabaseConnection,
}

impl IssueRequestRepository for DbIssueRequestRepository {
    async fn create(
        &self,
        request: &NewIssueRequest,
    ) -> Result<IssueRequestView, InventoryServiceError> {
        let model = issue_requests::ActiveModel {
            item_id: Set(request.item_id),
            user_id: Set(request.requester.user_id),
            user_email: Set(request.requester.email.clone()),
            username: Set(request.requester.username.clone()),
            quantity: Set(request.quantity),
            status: Set(IssueStatus::Pending.as_str().to_owned()),
            remarks: Set(request.remarks.clone()),
            created_at: Set(Utc::now()),
            decided_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create issue request")?;
        find_request_view(&self.db, model.id)
            .await?
            .ok_or(InventoryServiceError::ItemNotFound)
    }

    async fn find(&self, id: i32) -> Result<Option<IssueRequestView>, InventoryServiceError> {
        find_request_view(&self.db, id).await
    }

    async fn list(
        &self,
        filter: RequestFilter,
    ) -> Result<Vec<IssueRequestView>, InventoryServiceError> {
        let mut query = issue_requests::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(issue_requests::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(issue_requests::Column::Status.eq(status.as_str()));
        }
        let rows = query
            .order_by_desc(issue_requests::Column::CreatedAt)
            .order_by_desc(issue_requests::Column::Id)
            .find_also_related(items::Entity)
            .all(&self.db)
            .await
            .context("list issue requests")?;
        rows.into_iter()
            .map(|(request, item)| request_view(request, item))
            .collect()
    }

    async fn approve(&self, id: i32) -> Result<IssueRequestView, InventoryServiceError> {
        let result = self
            .db
            .transaction::<_, IssueRequestView, InventoryServiceError>(|txn| {
                Box::pin(async move {
                    let request = issue_requests::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .context("load issue request")?
                        .ok_or(InventoryServiceError::RequestNotFound)?;

                    if !decide(txn, id, IssueStatus::Approved).await? {
                        return Err(InventoryServiceError::RequestAlreadyProcessed);
                    }
                    // Rolls the status change back when stock is short.
                    if take_stock(txn, request.item_id, request.quantity).await? == 0 {
                        return Err(InventoryServiceError::InsufficientStock);
                    }

                    find_request_view(txn, id)
                        .await?
                        .ok_or(InventoryServiceError::RequestNotFound)
                })
            })
            .await;
        flatten(result, "approve issue request")
    }

    async fn reject(&self, id: i32) -> Result<IssueRequestView, InventoryServiceError> {
        if !decide(&self.db, id, IssueStatus::Rejected).await? {
            return match find_request_view(&self.db, id).await? {
                Some(_) => Err(InventoryServiceError::RequestAlreadyProcessed),
                None => Err(InventoryServiceError::RequestNotFound),
            };
        }
        find_request_view(&self.db, id)
            .await?
            .ok_or(InventoryServiceError::RequestNotFound)
    }

    async fn withdraw(&self, id: i32, expected: IssueStatus) -> Result<bool, InventoryServiceError> {
        let result = self
            .db
            .transaction::<_, bool, InventoryServiceError>(|txn| {
                Box::pin(async move {
                    let Some(request) = issue_requests::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .context("load issue request")?
                    else {
                        return Ok(false);
                    };

                    let deleted = issue_requests::Entity::delete_many()
                        .filter(issue_requests::Column::Id.eq(id))
                        .filter(issue_requests::Column::Status.eq(expected.as_str()))
                        .exec(txn)
                        .await
                        .context("delete issue request")?;
                    if deleted.rows_affected == 0 {
                        return Ok(false);
                    }

                    let reserved = expected.reserved_quantity(request.quantity);
                    if reserved > 0 {
                        return_stock(txn, request.item_id, reserved).await?;
                    }
                    Ok(true)
                })
            })
            .await;
        flatten(result, "withdraw issue request")
    }
}

/// Guarded `pending -> status` transition. `false` if the request was not pending.
async fn decide<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    status: IssueStatus,
) -> Result<bool, InventoryServiceError> {
    let result = issue_requests::Entity::update_many()
        .col_expr(issue_requests::Column::Status, Expr::value(status.as_str()))
        .col_expr(issue_requests::Column::DecidedAt, Expr::value(Utc::now()))
        .filter(issue_requests::Column::Id.eq(id))
        .filter(issue_requests::Column::Status.eq(IssueStatus::Pending.as_str()))
        .exec(conn)
        .await
        .context("update issue request status")?;
    Ok(result.rows_affected > 0)
}

async fn find_request_view<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<IssueRequestView>, InventoryServiceError> {
    let row = issue_requests::Entity::find_by_id(id)
        .find_also_related(items::Entity)
        .one(conn)
        .await
        .context("find issue request")?;
    row.map(|(request, item)| request_view(request, item))
        .transpose()
}

fn request_view(
    model: issue_requests::Model,
    item: Option<items::Model>,
) -> Result<IssueRequestView, InventoryServiceError> {
    let item = item.with_context(|| format!("item {} of issue request {}", model.item_id, model.id))?;
    let status: IssueStatus = model
        .status
        .parse()
        .with_context(|| format!("stored status of issue request {}", model.id))?;
    Ok(IssueRequestView {
        request: IssueRequest {
            id: model.id,
            item_id: model.item_id,
            requester: Requester {
                user_id: model.user_id,
                email: model.user_email,
                username: model.username,
            },
            quantity: model.quantity,
            status,
            remarks: model.remarks,
            created_at: model.created_at,
            decided_at: model.decided_at,
        },
        item: item_from_model(item),
    })
}

fn flatten<T>(
    result: Result<T, TransactionError<InventoryServiceError>>,
    action: &'static str,
) -> Result<T, InventoryServiceError> {
    match result {
        Ok(value) => Ok(value),
        Err(TransactionError::Transaction(err)) => Err(err),
        Err(TransactionError::Connection(err)) => Err(anyhow::Error::new(err).context(action).into()),
    }
}
