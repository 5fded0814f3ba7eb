use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubCategories::Name).string_len(50).not_null())
                    .col(ColumnDef::new(SubCategories::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubCategories::Table, SubCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_sub_categories_category_id_name_lower \
                 ON sub_categories (category_id, LOWER(name))",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubCategories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SubCategories {
    Table,
    Id,
    Name,
    CategoryId,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}
