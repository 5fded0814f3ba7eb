use sea_orm_migration::prelude::*;

mod m20250601_000001_create_categories;
mod m20250601_000002_create_sub_categories;
mod m20250601_000003_create_items;
mod m20250601_000004_create_issue_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_categories::Migration),
            Box::new(m20250601_000002_create_sub_categories::Migration),
            Box::new(m20250601_000003_create_items::Migration),
            Box::new(m20250601_000004_create_issue_requests::Migration),
        ]
    }
}
