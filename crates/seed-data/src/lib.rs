//! Development seed data for farmstead.
//!
//! Resets the game tables and writes a static item catalog plus one sample
//! player (character, inventory with starting items, farm with plots).
//! Intended for development and test databases only.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = SeedConfig::from_env()?;
//! config.ensure_safe_target()?;
//!
//! let store = PgStore::connect(&config.database_url, config.max_connections).await?;
//! let report = Seeder::new(store)
//!     .run_and_close(&config.load_plan()?)
//!     .await?;
//! ```

pub mod config;
pub mod db;
pub mod plan;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::db::{AccountReport, SeedError, SeedReport, Seeder};
    pub use crate::plan::{AccountDef, ItemDef, SeedPlan, StartingItem};
    pub use farmstead::store::{Collection, MemoryStore, PgStore, Store};
}
