//! Declarative seed data.
//!
//! The item catalog and the sample account are plain JSON records, embedded
//! at compile time and optionally replaced from a directory on disk.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::SeedError;
use farmstead::models::{Item, ItemType, Rarity};

pub const CATALOG_FILE: &str = "catalog.json";
pub const ACCOUNT_FILE: &str = "sample_account.json";

/// Upper bounds on container sizes, well above anything the game hands out.
pub const MAX_INVENTORY_SLOTS: i32 = 200;
pub const MAX_FARM_PLOTS: i32 = 100;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");
const BUILTIN_ACCOUNT: &str = include_str!("../data/sample_account.json");

/// A catalog entry as written in `catalog.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub base_price: i32,
    pub stackable: bool,
}

impl ItemDef {
    pub fn to_item(&self) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            description: self.description.clone(),
            item_type: self.item_type,
            rarity: self.rarity,
            base_price: self.base_price,
            stackable: self.stackable,
        }
    }
}

fn default_quantity() -> i32 {
    1
}

/// An item placed in the sample inventory, resolved against the catalog by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingItem {
    pub name: String,
    pub position: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CharacterDef {
    #[validate(length(min = 1, max = 64, message = "Character name must be 1-64 characters"))]
    pub name: String,
    #[validate(range(min = 1))]
    pub level: i32,
    #[validate(range(min = 0))]
    pub experience: i32,
    #[validate(range(min = 0))]
    pub energy: i32,
    #[validate(range(min = 1))]
    pub max_energy: i32,
    #[validate(range(min = 0))]
    pub coins: i32,
    #[validate(range(min = 1))]
    pub farming_level: i32,
    #[validate(range(min = 1))]
    pub mining_level: i32,
    #[validate(range(min = 1))]
    pub fishing_level: i32,
    #[validate(range(min = 1))]
    pub combat_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InventoryDef {
    #[validate(range(min = 1, max = MAX_INVENTORY_SLOTS))]
    pub max_slots: i32,
    #[serde(default)]
    pub starting_items: Vec<StartingItem>,
}

impl InventoryDef {
    /// Every starting item needs a distinct slot in `0..max_slots` and a
    /// positive quantity.
    pub fn check_slots(&self) -> Result<(), SeedError> {
        let max_slots = self.max_slots;
        let mut positions = HashSet::new();
        for slot in &self.starting_items {
            if slot.quantity < 1 {
                return Err(SeedError::InvalidPlan(format!(
                    "starting item {:?} has quantity {}",
                    slot.name, slot.quantity
                )));
            }
            if slot.position < 0 || slot.position >= max_slots {
                return Err(SeedError::InvalidPlan(format!(
                    "starting item {:?} at position {} is outside 0..{max_slots}",
                    slot.name, slot.position
                )));
            }
            if !positions.insert(slot.position) {
                return Err(SeedError::InvalidPlan(format!(
                    "two starting items share position {}",
                    slot.position
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FarmDef {
    #[validate(length(min = 1, message = "Farm name is required"))]
    pub name: String,
    #[validate(range(min = 1))]
    pub level: i32,
    #[validate(range(min = 1, max = MAX_FARM_PLOTS))]
    pub max_plots: i32,
}

/// The sample player: credentials plus the records that hang off the user.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct AccountDef {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(nested)]
    pub character: CharacterDef,
    #[validate(nested)]
    pub inventory: InventoryDef,
    #[validate(nested)]
    pub farm: FarmDef,
}

impl fmt::Debug for AccountDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountDef")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("character", &self.character)
            .field("inventory", &self.inventory)
            .field("farm", &self.farm)
            .finish()
    }
}

impl AccountDef {
    /// Checks the account on its own, without the catalog.
    pub fn check(&self) -> Result<(), SeedError> {
        self.validate()
            .map_err(|e| SeedError::InvalidPlan(format!("sample account: {e}")))?;

        if self.character.energy > self.character.max_energy {
            return Err(SeedError::InvalidPlan(format!(
                "character energy {} exceeds max energy {}",
                self.character.energy, self.character.max_energy
            )));
        }

        self.inventory.check_slots()
    }
}

/// Everything one seed run writes.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub items: Vec<ItemDef>,
    pub account: AccountDef,
}

impl SeedPlan {
    /// The reference data compiled into the crate.
    pub fn builtin() -> Result<Self, SeedError> {
        Ok(Self {
            items: parse(CATALOG_FILE, BUILTIN_CATALOG)?,
            account: parse(ACCOUNT_FILE, BUILTIN_ACCOUNT)?,
        })
    }

    /// Loads `catalog.json` and `sample_account.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, SeedError> {
        Ok(Self {
            items: read(&dir.join(CATALOG_FILE))?,
            account: read(&dir.join(ACCOUNT_FILE))?,
        })
    }

    pub fn catalog_item(&self, name: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Checks the plan for data bugs before anything is written.
    ///
    /// Starting items that name an item missing from the catalog are allowed;
    /// the seeder skips them.
    pub fn validate(&self) -> Result<(), SeedError> {
        let mut names = HashSet::new();
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(SeedError::InvalidPlan(
                    "catalog item with an empty name".to_string(),
                ));
            }
            if !names.insert(item.name.as_str()) {
                return Err(SeedError::InvalidPlan(format!(
                    "duplicate catalog item {:?}",
                    item.name
                )));
            }
            if item.base_price <= 0 {
                return Err(SeedError::InvalidPlan(format!(
                    "catalog item {:?} has non-positive base price {}",
                    item.name, item.base_price
                )));
            }
        }

        self.account.check()?;

        for slot in &self.account.inventory.starting_items {
            let stacked_single = self
                .catalog_item(&slot.name)
                .is_some_and(|def| !def.stackable && slot.quantity > 1);
            if stacked_single {
                return Err(SeedError::InvalidPlan(format!(
                    "{:?} is not stackable but starts with quantity {}",
                    slot.name, slot.quantity
                )));
            }
        }

        Ok(())
    }
}

fn parse<T: serde::de::DeserializeOwned>(name: &str, text: &str) -> Result<T, SeedError> {
    serde_json::from_str(text).map_err(|source| SeedError::DataFormat {
        path: name.into(),
        source,
    })
}

fn read<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    let text = std::fs::read_to_string(path).map_err(|source| SeedError::DataIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SeedError::DataFormat {
        path: path.to_path_buf(),
        source,
    })
}
