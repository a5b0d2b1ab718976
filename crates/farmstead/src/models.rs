use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Seed,
    Tool,
    Crop,
    Material,
    Potion,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Seed => "SEED",
            ItemType::Tool => "TOOL",
            ItemType::Crop => "CROP",
            ItemType::Material => "MATERIAL",
            ItemType::Potion => "POTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "rarity", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Uncommon => "UNCOMMON",
            Rarity::Rare => "RARE",
        }
    }
}

/// Catalog entry. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub base_price: i32,
    pub stackable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// PHC-formatted Argon2 hash, never the plaintext.
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub level: i32,
    pub experience: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub coins: i32,
    pub farming_level: i32,
    pub mining_level: i32,
    pub fishing_level: i32,
    pub combat_level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Inventory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub max_slots: i32,
}

/// A stack of one item occupying a zero-based slot of an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Farm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub level: i32,
    pub max_plots: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FarmPlot {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub position: i32,
    pub water_level: i32,
    pub is_watered: bool,
}

impl FarmPlot {
    /// A dry, empty plot at `position`.
    pub fn empty(farm_id: Uuid, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            farm_id,
            position,
            water_level: 0,
            is_watered: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MarketListing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub price: i32,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_match_schema() {
        assert_eq!(ItemType::Material.as_str(), "MATERIAL");
        assert_eq!(Rarity::Uncommon.as_str(), "UNCOMMON");

        let parsed: ItemType = serde_json::from_str("\"POTION\"").unwrap();
        assert_eq!(parsed, ItemType::Potion);
    }

    #[test]
    fn test_empty_plot_is_dry() {
        let farm_id = Uuid::new_v4();
        let plot = FarmPlot::empty(farm_id, 4);

        assert_eq!(plot.farm_id, farm_id);
        assert_eq!(plot.position, 4);
        assert_eq!(plot.water_level, 0);
        assert!(!plot.is_watered);
    }
}
