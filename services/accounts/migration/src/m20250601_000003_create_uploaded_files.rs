use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadedFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadedFiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UploadedFiles::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UploadedFiles::Filename)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UploadedFiles::Size).big_integer().not_null())
                    .col(
                        ColumnDef::new(UploadedFiles::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UploadedFiles::Year).string_len(10).null())
                    .col(ColumnDef::new(UploadedFiles::StoragePath).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UploadedFiles::Table, UploadedFiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(UploadedFiles::Table)
                    .col(UploadedFiles::UserId)
                    .col(UploadedFiles::UploadedAt)
                    .name("idx_uploaded_files_user_id_uploaded_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UploadedFiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UploadedFiles {
    Table,
    Id,
    UserId,
    Filename,
    Size,
    UploadedAt,
    Year,
    StoragePath,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
