use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IssueRequests::ItemId).integer().not_null())
                    .col(ColumnDef::new(IssueRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(IssueRequests::UserEmail).string_len(254).not_null())
                    .col(ColumnDef::new(IssueRequests::Username).string_len(150).null())
                    .col(
                        ColumnDef::new(IssueRequests::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(IssueRequests::Quantity).gt(0)),
                    )
                    .col(
                        ColumnDef::new(IssueRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(IssueRequests::Remarks).text().null())
                    .col(
                        ColumnDef::new(IssueRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(IssueRequests::DecidedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(IssueRequests::Table, IssueRequests::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(IssueRequests::Table)
                    .col(IssueRequests::UserId)
                    .col(IssueRequests::CreatedAt)
                    .name("idx_issue_requests_user_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(IssueRequests::Table)
                    .col(IssueRequests::Status)
                    .name("idx_issue_requests_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IssueRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IssueRequests {
    Table,
    Id,
    ItemId,
    UserId,
    UserEmail,
    Username,
    Quantity,
    Status,
    Remarks,
    CreatedAt,
    DecidedAt,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
}
