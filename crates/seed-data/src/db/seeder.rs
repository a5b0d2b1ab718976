//! Database seeding utilities.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::plan::{AccountDef, ItemDef, SeedPlan};
use farmstead::auth::{HashCost, hash_password_with};
use farmstead::errors::AppError;
use farmstead::models::{Character, Farm, FarmPlot, Inventory, InventoryItem, User};
use farmstead::store::{Collection, Store};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Storage error: {0}")]
    Store(#[from] AppError),
    #[error("Invalid seed plan: {0}")]
    InvalidPlan(String),
    #[error("Failed to read seed data {}: {source}", path.display())]
    DataIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed seed data {}: {source}", path.display())]
    DataFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Refusing to seed: {0}")]
    UnsafeEnvironment(String),
}

/// Ids and counts for the sample account's records.
#[derive(Debug, Clone)]
pub struct AccountReport {
    pub user_id: Uuid,
    pub character_id: Uuid,
    pub inventory_id: Uuid,
    pub inventory_items_created: usize,
    /// Starting items whose name had no catalog match.
    pub skipped_starting_items: Vec<String>,
    pub farm_id: Uuid,
    pub plots_created: usize,
}

/// Outcome of a full seed run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Rows removed per collection, in reset order.
    pub deleted: Vec<(Collection, u64)>,
    pub items_created: usize,
    pub account: AccountReport,
}

impl SeedReport {
    pub fn rows_deleted(&self) -> u64 {
        self.deleted.iter().map(|(_, n)| n).sum()
    }
}

/// Writes seed data through a [`Store`].
///
/// Every step runs strictly in sequence. Storage failures abort the run;
/// the only tolerated miss is a starting item absent from the catalog.
pub struct Seeder<S> {
    store: S,
    hash_cost: HashCost,
}

impl<S: Store> Seeder<S> {
    /// Creates a new seeder writing through `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            hash_cost: HashCost::default(),
        }
    }

    /// Sets the Argon2 work factor for the sample account's password.
    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Validates `plan`, clears the game tables and writes the plan.
    ///
    /// Nothing is deleted when the plan fails validation.
    pub async fn run(&self, plan: &SeedPlan) -> Result<SeedReport, SeedError> {
        plan.validate()?;

        let deleted = self.reset().await?;
        let items_created = self.seed_catalog(&plan.items).await?;
        let account = self.seed_account(&plan.account).await?;

        Ok(SeedReport {
            deleted,
            items_created,
            account,
        })
    }

    /// Runs `plan`, then closes the store whether or not the run succeeded.
    pub async fn run_and_close(self, plan: &SeedPlan) -> Result<SeedReport, SeedError> {
        let outcome = self.run(plan).await;
        match &outcome {
            Err(SeedError::Store(e)) if e.is_constraint_violation() => {
                error!("Seeding failed on a constraint, check the seed data: {e}");
            }
            Err(e) => error!("Seeding failed: {e}"),
            Ok(_) => {}
        }
        self.store.close().await;
        outcome
    }

    /// Clears all game data.
    ///
    /// **WARNING**: This deletes all data from the tables. Use with caution.
    pub async fn reset(&self) -> Result<Vec<(Collection, u64)>, SeedError> {
        info!("Clearing existing game data...");

        // Order matters due to foreign key constraints
        let mut deleted = Vec::with_capacity(Collection::RESET_ORDER.len());
        for collection in Collection::RESET_ORDER {
            let rows = self.store.delete_all(collection).await?;
            debug!("  Cleared {rows} rows from {collection}");
            deleted.push((collection, rows));
        }

        let total: u64 = deleted.iter().map(|(_, n)| n).sum();
        info!("Cleared {total} rows");
        Ok(deleted)
    }

    /// Seeds the item catalog.
    pub async fn seed_catalog(&self, items: &[ItemDef]) -> Result<usize, SeedError> {
        info!("Seeding {} catalog items...", items.len());

        for def in items {
            self.store.create_item(&def.to_item()).await?;
            debug!(
                "  {} ({}, {})",
                def.name,
                def.item_type.as_str(),
                def.rarity.as_str()
            );
        }

        info!("Seeded {} catalog items", items.len());
        Ok(items.len())
    }

    /// Seeds the sample user together with its character, inventory and farm.
    ///
    /// The account is checked first; a slot outside the inventory is rejected
    /// before anything is written.
    pub async fn seed_account(&self, account: &AccountDef) -> Result<AccountReport, SeedError> {
        info!("Seeding sample account {}...", account.username);
        account.check()?;

        let password_hash = hash_password_with(&account.password, self.hash_cost)?;
        let user = User::new(
            account.email.clone(),
            account.username.clone(),
            password_hash,
        );
        let user_id = self.store.create_user(&user).await?;

        let stats = &account.character;
        let character_id = self
            .store
            .create_character(&Character {
                id: Uuid::new_v4(),
                user_id,
                name: stats.name.clone(),
                level: stats.level,
                experience: stats.experience,
                energy: stats.energy,
                max_energy: stats.max_energy,
                coins: stats.coins,
                farming_level: stats.farming_level,
                mining_level: stats.mining_level,
                fishing_level: stats.fishing_level,
                combat_level: stats.combat_level,
            })
            .await?;

        let inventory_id = self
            .store
            .create_inventory(&Inventory {
                id: Uuid::new_v4(),
                user_id,
                max_slots: account.inventory.max_slots,
            })
            .await?;

        let mut inventory_items_created = 0;
        let mut skipped_starting_items = Vec::new();
        for slot in &account.inventory.starting_items {
            let Some(item) = self.store.find_item_by_name(&slot.name).await? else {
                warn!(
                    "Starting item {:?} not in catalog, leaving slot {} empty",
                    slot.name, slot.position
                );
                skipped_starting_items.push(slot.name.clone());
                continue;
            };

            self.store
                .create_inventory_item(&InventoryItem {
                    id: Uuid::new_v4(),
                    inventory_id,
                    item_id: item.id,
                    quantity: slot.quantity,
                    position: slot.position,
                })
                .await?;
            inventory_items_created += 1;
        }

        let farm_id = self
            .store
            .create_farm(&Farm {
                id: Uuid::new_v4(),
                user_id,
                name: account.farm.name.clone(),
                level: account.farm.level,
                max_plots: account.farm.max_plots,
            })
            .await?;

        for position in 0..account.farm.max_plots {
            self.store
                .create_farm_plot(&FarmPlot::empty(farm_id, position))
                .await?;
        }

        info!(
            "Seeded account {} with {} starting items and {} farm plots",
            account.username, inventory_items_created, account.farm.max_plots
        );

        Ok(AccountReport {
            user_id,
            character_id,
            inventory_id,
            inventory_items_created,
            skipped_starting_items,
            farm_id,
            plots_created: account.farm.max_plots as usize,
        })
    }

    /// Returns a reference to the store for advanced usage.
    pub fn store(&self) -> &S {
        &self.store
    }
}
