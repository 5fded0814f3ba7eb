use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub sub_category_id: Option<i32>,
    pub name: String,
    pub serial_number: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cost: Decimal,
    /// Units in stock; never negative.
    pub quantity: i32,
    pub gst_number: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub purchase_date: chrono::DateTime<chrono::Utc>,
    pub bill_number: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::sub_categories::Entity",
        from = "Column::SubCategoryId",
        to = "super::sub_categories::Column::Id",
        on_delete = "Cascade"
    )]
    SubCategory,
    #[sea_orm(has_many = "super::issue_requests::Entity")]
    IssueRequests,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::sub_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategory.def()
    }
}

impl Related<super::issue_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IssueRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
