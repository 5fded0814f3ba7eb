use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Items::SubCategoryId).integer().null())
                    .col(ColumnDef::new(Items::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Items::SerialNumber).string_len(100).not_null())
                    .col(ColumnDef::new(Items::Cost).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Items::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Items::Quantity).gte(0)),
                    )
                    .col(ColumnDef::new(Items::GstNumber).string_len(15).not_null())
                    .col(ColumnDef::new(Items::BuyerName).string_len(100).not_null())
                    .col(ColumnDef::new(Items::BuyerEmail).string_len(254).not_null())
                    .col(
                        ColumnDef::new(Items::PurchaseDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Items::BillNumber).string_len(50).null())
                    .col(ColumnDef::new(Items::Remarks).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Items::Table, Items::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Items::Table, Items::SubCategoryId)
                            .to(SubCategories::Table, SubCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Missing sub-category and bill number count as equal values.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS unique_item_group ON items \
                 (category_id, COALESCE(sub_category_id, 0), serial_number, COALESCE(bill_number, ''))",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    CategoryId,
    SubCategoryId,
    Name,
    SerialNumber,
    Cost,
    Quantity,
    GstNumber,
    BuyerName,
    BuyerEmail,
    PurchaseDate,
    BillNumber,
    Remarks,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}

#[derive(Iden)]
enum SubCategories {
    Table,
    Id,
}
