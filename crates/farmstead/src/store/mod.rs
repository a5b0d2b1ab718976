//! Storage backends.
//!
//! [`Store`] is the write-side API the game's tooling needs: bulk delete per
//! collection, single-record create returning the new id, and item lookup by
//! its unique name. Implementations enforce the schema's unique and
//! foreign-key constraints and report violations as [`AppError`] variants.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Character, Farm, FarmPlot, Inventory, InventoryItem, Item, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A persisted entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    ChatMessages,
    MarketListings,
    InventoryItems,
    Inventories,
    FarmPlots,
    Farms,
    Characters,
    Items,
    Users,
}

impl Collection {
    /// Every collection, children before the parents they reference.
    pub const RESET_ORDER: [Collection; 9] = [
        Collection::ChatMessages,
        Collection::MarketListings,
        Collection::InventoryItems,
        Collection::Inventories,
        Collection::FarmPlots,
        Collection::Farms,
        Collection::Characters,
        Collection::Items,
        Collection::Users,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::ChatMessages => "chat_messages",
            Collection::MarketListings => "market_listings",
            Collection::InventoryItems => "inventory_items",
            Collection::Inventories => "inventories",
            Collection::FarmPlots => "farm_plots",
            Collection::Farms => "farms",
            Collection::Characters => "characters",
            Collection::Items => "items",
            Collection::Users => "users",
        }
    }

    /// Collections holding rows that reference this one.
    pub fn dependents(&self) -> &'static [Collection] {
        match self {
            Collection::Users => &[
                Collection::ChatMessages,
                Collection::MarketListings,
                Collection::Inventories,
                Collection::Farms,
                Collection::Characters,
            ],
            Collection::Items => &[Collection::InventoryItems, Collection::MarketListings],
            Collection::Inventories => &[Collection::InventoryItems],
            Collection::Farms => &[Collection::FarmPlots],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Deletes every row of `collection`, returning the number removed.
    async fn delete_all(&self, collection: Collection) -> Result<u64, AppError>;

    async fn create_item(&self, item: &Item) -> Result<Uuid, AppError>;

    async fn find_item_by_name(&self, name: &str) -> Result<Option<Item>, AppError>;

    async fn create_user(&self, user: &User) -> Result<Uuid, AppError>;

    async fn create_character(&self, character: &Character) -> Result<Uuid, AppError>;

    async fn create_inventory(&self, inventory: &Inventory) -> Result<Uuid, AppError>;

    async fn create_inventory_item(&self, entry: &InventoryItem) -> Result<Uuid, AppError>;

    async fn create_farm(&self, farm: &Farm) -> Result<Uuid, AppError>;

    async fn create_farm_plot(&self, plot: &FarmPlot) -> Result<Uuid, AppError>;

    /// Releases the underlying connection(s). Called exactly once, last.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_order_deletes_dependents_first() {
        for (i, collection) in Collection::RESET_ORDER.iter().enumerate() {
            for dependent in collection.dependents() {
                let dep_index = Collection::RESET_ORDER
                    .iter()
                    .position(|c| c == dependent)
                    .unwrap();
                assert!(
                    dep_index < i,
                    "{dependent} must be cleared before {collection}"
                );
            }
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Collection::InventoryItems.to_string(), "inventory_items");
        assert_eq!(Collection::RESET_ORDER.last(), Some(&Collection::Users));
    }
}
