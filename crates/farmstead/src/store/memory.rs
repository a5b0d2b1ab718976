use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{Collection, Store};
use crate::errors::AppError;
use crate::models::{
    Character, ChatMessage, Farm, FarmPlot, Inventory, InventoryItem, Item, MarketListing, User,
};

#[derive(Debug, Default)]
struct Tables {
    chat_messages: Vec<ChatMessage>,
    market_listings: Vec<MarketListing>,
    inventory_items: Vec<InventoryItem>,
    inventories: Vec<Inventory>,
    farm_plots: Vec<FarmPlot>,
    farms: Vec<Farm>,
    characters: Vec<Character>,
    items: Vec<Item>,
    users: Vec<User>,
}

impl Tables {
    fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::ChatMessages => self.chat_messages.len(),
            Collection::MarketListings => self.market_listings.len(),
            Collection::InventoryItems => self.inventory_items.len(),
            Collection::Inventories => self.inventories.len(),
            Collection::FarmPlots => self.farm_plots.len(),
            Collection::Farms => self.farms.len(),
            Collection::Characters => self.characters.len(),
            Collection::Items => self.items.len(),
            Collection::Users => self.users.len(),
        }
    }

    fn clear(&mut self, collection: Collection) {
        match collection {
            Collection::ChatMessages => self.chat_messages.clear(),
            Collection::MarketListings => self.market_listings.clear(),
            Collection::InventoryItems => self.inventory_items.clear(),
            Collection::Inventories => self.inventories.clear(),
            Collection::FarmPlots => self.farm_plots.clear(),
            Collection::Farms => self.farms.clear(),
            Collection::Characters => self.characters.clear(),
            Collection::Items => self.items.clear(),
            Collection::Users => self.users.clear(),
        }
    }

    fn has_user(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn has_item(&self, id: Uuid) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    fn require_user(&self, entity: &'static str, user_id: Uuid) -> Result<(), AppError> {
        if self.has_user(user_id) {
            Ok(())
        } else {
            Err(AppError::ForeignKeyViolation {
                entity,
                detail: format!("user {user_id} does not exist"),
            })
        }
    }
}

fn unique(entity: &'static str, key: impl Into<String>) -> AppError {
    AppError::UniqueViolation {
        entity,
        key: key.into(),
    }
}

fn check(entity: &'static str, detail: impl Into<String>) -> AppError {
    AppError::CheckViolation {
        entity,
        detail: detail.into(),
    }
}

/// In-process store with the same constraints as the SQL schema.
///
/// Cloning shares the underlying tables, so a test can keep a handle for
/// inspection after handing one to a consumer that closes it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock leaves the tables consistent:
        // every mutation validates before it writes.
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.lock().len(collection)
    }

    pub fn items(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn characters(&self) -> Vec<Character> {
        self.lock().characters.clone()
    }

    pub fn inventories(&self) -> Vec<Inventory> {
        self.lock().inventories.clone()
    }

    pub fn inventory_items(&self) -> Vec<InventoryItem> {
        self.lock().inventory_items.clone()
    }

    pub fn farms(&self) -> Vec<Farm> {
        self.lock().farms.clone()
    }

    pub fn farm_plots(&self) -> Vec<FarmPlot> {
        self.lock().farm_plots.clone()
    }

    /// Inserts a chat message, e.g. to simulate gameplay rows before a reset.
    pub fn insert_chat_message(&self, message: ChatMessage) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        tables.require_user("chat_messages", message.sender_id)?;
        let id = message.id;
        tables.chat_messages.push(message);
        Ok(id)
    }

    pub fn insert_market_listing(&self, listing: MarketListing) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        tables.require_user("market_listings", listing.seller_id)?;
        if !tables.has_item(listing.item_id) {
            return Err(AppError::ForeignKeyViolation {
                entity: "market_listings",
                detail: format!("item {} does not exist", listing.item_id),
            });
        }
        if listing.quantity < 1 || listing.price < 1 {
            return Err(check("market_listings", "quantity and price must be positive"));
        }
        let id = listing.id;
        tables.market_listings.push(listing);
        Ok(id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn delete_all(&self, collection: Collection) -> Result<u64, AppError> {
        let mut tables = self.lock();

        if let Some(blocking) = collection
            .dependents()
            .iter()
            .find(|dep| tables.len(**dep) > 0)
        {
            return Err(AppError::ForeignKeyViolation {
                entity: collection.table_name(),
                detail: format!("rows in {blocking} still reference {collection}"),
            });
        }

        let removed = tables.len(collection) as u64;
        tables.clear(collection);
        Ok(removed)
    }

    async fn create_item(&self, item: &Item) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        if tables.items.iter().any(|i| i.name == item.name) {
            return Err(unique("items", &item.name));
        }
        if item.base_price <= 0 {
            return Err(check("items", "base_price must be positive"));
        }
        tables.items.push(item.clone());
        Ok(item.id)
    }

    async fn find_item_by_name(&self, name: &str) -> Result<Option<Item>, AppError> {
        Ok(self.lock().items.iter().find(|i| i.name == name).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(unique("users", &user.email));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(unique("users", &user.username));
        }
        tables.users.push(user.clone());
        Ok(user.id)
    }

    async fn create_character(&self, character: &Character) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        tables.require_user("characters", character.user_id)?;
        if tables
            .characters
            .iter()
            .any(|c| c.user_id == character.user_id)
        {
            return Err(unique("characters", character.user_id.to_string()));
        }
        if character.level < 1 || character.energy < 0 || character.energy > character.max_energy
        {
            return Err(check("characters", "level or energy out of range"));
        }
        tables.characters.push(character.clone());
        Ok(character.id)
    }

    async fn create_inventory(&self, inventory: &Inventory) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        tables.require_user("inventories", inventory.user_id)?;
        if tables
            .inventories
            .iter()
            .any(|i| i.user_id == inventory.user_id)
        {
            return Err(unique("inventories", inventory.user_id.to_string()));
        }
        if inventory.max_slots < 1 {
            return Err(check("inventories", "max_slots must be at least 1"));
        }
        tables.inventories.push(inventory.clone());
        Ok(inventory.id)
    }

    async fn create_inventory_item(&self, entry: &InventoryItem) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        let Some(max_slots) = tables
            .inventories
            .iter()
            .find(|i| i.id == entry.inventory_id)
            .map(|i| i.max_slots)
        else {
            return Err(AppError::ForeignKeyViolation {
                entity: "inventory_items",
                detail: format!("inventory {} does not exist", entry.inventory_id),
            });
        };
        if !tables.has_item(entry.item_id) {
            return Err(AppError::ForeignKeyViolation {
                entity: "inventory_items",
                detail: format!("item {} does not exist", entry.item_id),
            });
        }
        if entry.quantity < 1 || entry.position < 0 {
            return Err(check("inventory_items", "quantity or position out of range"));
        }
        if entry.position >= max_slots {
            return Err(check(
                "inventory_items",
                format!("slot {} is past the inventory capacity", entry.position),
            ));
        }
        if tables
            .inventory_items
            .iter()
            .any(|e| e.inventory_id == entry.inventory_id && e.position == entry.position)
        {
            return Err(unique(
                "inventory_items",
                format!("position {}", entry.position),
            ));
        }
        tables.inventory_items.push(entry.clone());
        Ok(entry.id)
    }

    async fn create_farm(&self, farm: &Farm) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        tables.require_user("farms", farm.user_id)?;
        if tables.farms.iter().any(|f| f.user_id == farm.user_id) {
            return Err(unique("farms", farm.user_id.to_string()));
        }
        if farm.level < 1 || farm.max_plots < 1 {
            return Err(check("farms", "level and max_plots must be at least 1"));
        }
        tables.farms.push(farm.clone());
        Ok(farm.id)
    }

    async fn create_farm_plot(&self, plot: &FarmPlot) -> Result<Uuid, AppError> {
        let mut tables = self.lock();
        if !tables.farms.iter().any(|f| f.id == plot.farm_id) {
            return Err(AppError::ForeignKeyViolation {
                entity: "farm_plots",
                detail: format!("farm {} does not exist", plot.farm_id),
            });
        }
        if plot.position < 0 || plot.water_level < 0 {
            return Err(check("farm_plots", "position or water_level negative"));
        }
        if tables
            .farm_plots
            .iter()
            .any(|p| p.farm_id == plot.farm_id && p.position == plot.position)
        {
            return Err(unique("farm_plots", format!("position {}", plot.position)));
        }
        tables.farm_plots.push(plot.clone());
        Ok(plot.id)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
