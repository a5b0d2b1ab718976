//! Default seed script - resets the game tables and writes the sample data
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed
//! ```

use anyhow::Context;
use farmstead::store::{PgStore, Store};
use seed_data::config::SeedConfig;
use seed_data::db::Seeder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;
    config.ensure_safe_target()?;
    let plan = config.load_plan()?;

    let store = PgStore::connect(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    if config.run_migrations {
        if let Err(e) = store.migrate().await {
            store.close().await;
            return Err(e).context("Failed to apply migrations");
        }
    }

    let report = Seeder::new(store)
        .run_and_close(&plan)
        .await
        .context("Failed to seed database")?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Rows cleared: {}", report.rows_deleted());
    tracing::info!("  Items: {}", report.items_created);
    tracing::info!(
        "  Inventory items: {}",
        report.account.inventory_items_created
    );
    tracing::info!("  Farm plots: {}", report.account.plots_created);
    if !report.account.skipped_starting_items.is_empty() {
        tracing::warn!(
            "  Skipped starting items: {}",
            report.account.skipped_starting_items.join(", ")
        );
    }

    println!("Database has been seeded with initial game data!");
    Ok(())
}
