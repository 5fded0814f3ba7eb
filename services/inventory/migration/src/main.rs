use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(campus_inventory_migration::Migrator).await;
}
