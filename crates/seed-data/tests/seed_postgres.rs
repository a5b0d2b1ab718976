//! Integration test for seeding a real Postgres database.
//!
//! To run this test, you need:
//! 1. A disposable PostgreSQL database
//! 2. DATABASE_URL environment variable set
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p seed-data seed_postgres`
//!
//! Note: The test applies the schema migrations and then deletes every game
//! row. Never point it at a database you care about.

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;

use farmstead::auth::{HashCost, verify_password};
use farmstead::store::PgStore;
use seed_data::db::Seeder;
use seed_data::plan::SeedPlan;

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    match PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

#[tokio::test]
async fn test_seed_twice_against_postgres() {
    let Some(pool) = get_test_pool().await else {
        return;
    };

    let store = PgStore::new(pool.clone());
    store.migrate().await.expect("Failed to apply migrations");

    let plan = SeedPlan::builtin().unwrap();
    let seeder = Seeder::new(store).with_hash_cost(HashCost::testing());
    seeder.run(&plan).await.expect("First seed failed");
    let report = seeder.run(&plan).await.expect("Second seed failed");

    assert_eq!(report.items_created, 13);
    assert_eq!(count(&pool, "items").await, 13);
    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "characters").await, 1);
    assert_eq!(count(&pool, "inventories").await, 1);
    assert_eq!(count(&pool, "inventory_items").await, 5);
    assert_eq!(count(&pool, "farms").await, 1);
    assert_eq!(count(&pool, "farm_plots").await, 9);

    let (level, coins): (i32, i32) = sqlx::query_as(
        r#"
        SELECT c.level, c.coins
        FROM characters c
        JOIN users u ON u.id = c.user_id
        WHERE u.username = 'testuser'
        "#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((level, coins), (1, 100));

    let slots: Vec<(i32, i32)> = sqlx::query_as(
        "SELECT position, quantity FROM inventory_items ORDER BY position",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(slots, vec![(0, 1), (1, 1), (2, 1), (3, 5), (4, 5)]);

    let plots: Vec<(i32, i32, bool)> = sqlx::query_as(
        "SELECT position, water_level, is_watered FROM farm_plots ORDER BY position",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let expected: Vec<(i32, i32, bool)> = (0..9).map(|p| (p, 0, false)).collect();
    assert_eq!(plots, expected);

    let orphans: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM inventory_items ii
        LEFT JOIN items i ON i.id = ii.item_id
        LEFT JOIN inventories inv ON inv.id = ii.inventory_id
        WHERE i.id IS NULL OR inv.id IS NULL
        "#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans, 0);

    let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = $1")
        .bind("testuser")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(hash, "password123");
    assert!(verify_password("password123", &hash).unwrap());
}
