use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Collection, Store};
use crate::errors::AppError;
use crate::models::{Character, Farm, FarmPlot, Inventory, InventoryItem, Item, User};

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?;
        info!("Schema migrations applied");
        Ok(())
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn delete_statement(collection: Collection) -> &'static str {
    match collection {
        Collection::ChatMessages => "DELETE FROM chat_messages",
        Collection::MarketListings => "DELETE FROM market_listings",
        Collection::InventoryItems => "DELETE FROM inventory_items",
        Collection::Inventories => "DELETE FROM inventories",
        Collection::FarmPlots => "DELETE FROM farm_plots",
        Collection::Farms => "DELETE FROM farms",
        Collection::Characters => "DELETE FROM characters",
        Collection::Items => "DELETE FROM items",
        Collection::Users => "DELETE FROM users",
    }
}

#[async_trait]
impl Store for PgStore {
    async fn delete_all(&self, collection: Collection) -> Result<u64, AppError> {
        let result = sqlx::query(delete_statement(collection))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(collection.table_name(), e))?;

        debug!("Deleted {} rows from {collection}", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn create_item(&self, item: &Item) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO items (id, name, description, item_type, rarity, base_price, stackable)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.item_type)
        .bind(item.rarity)
        .bind(item.base_price)
        .bind(item.stackable)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("items", e))?;

        Ok(id)
    }

    async fn find_item_by_name(&self, name: &str) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as(
            r#"
            SELECT id, name, description, item_type, rarity, base_price, stackable
            FROM items
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn create_user(&self, user: &User) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, email, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("users", e))?;

        Ok(id)
    }

    async fn create_character(&self, character: &Character) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO characters (
                id, user_id, name, level, experience, energy, max_energy, coins,
                farming_level, mining_level, fishing_level, combat_level
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(character.id)
        .bind(character.user_id)
        .bind(&character.name)
        .bind(character.level)
        .bind(character.experience)
        .bind(character.energy)
        .bind(character.max_energy)
        .bind(character.coins)
        .bind(character.farming_level)
        .bind(character.mining_level)
        .bind(character.fishing_level)
        .bind(character.combat_level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("characters", e))?;

        Ok(id)
    }

    async fn create_inventory(&self, inventory: &Inventory) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO inventories (id, user_id, max_slots)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(inventory.id)
        .bind(inventory.user_id)
        .bind(inventory.max_slots)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("inventories", e))?;

        Ok(id)
    }

    async fn create_inventory_item(&self, entry: &InventoryItem) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO inventory_items (id, inventory_id, item_id, quantity, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(entry.id)
        .bind(entry.inventory_id)
        .bind(entry.item_id)
        .bind(entry.quantity)
        .bind(entry.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("inventory_items", e))?;

        Ok(id)
    }

    async fn create_farm(&self, farm: &Farm) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO farms (id, user_id, name, level, max_plots)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(farm.id)
        .bind(farm.user_id)
        .bind(&farm.name)
        .bind(farm.level)
        .bind(farm.max_plots)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("farms", e))?;

        Ok(id)
    }

    async fn create_farm_plot(&self, plot: &FarmPlot) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO farm_plots (id, farm_id, position, water_level, is_watered)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(plot.id)
        .bind(plot.farm_id)
        .bind(plot.position)
        .bind(plot.water_level)
        .bind(plot.is_watered)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write("farm_plots", e))?;

        Ok(id)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}
