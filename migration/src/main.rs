//! Schema CLI for the telemetry store (`up`, `down`, `status`, `fresh`, ...).

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    // DATABASE_URL usually comes from the workspace .env
    dotenvy::dotenv().ok();
    cli::run_cli(migration::Migrator).await;
}
