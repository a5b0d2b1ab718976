//! Database integration for seeding game data.
//!
//! The [`Seeder`] resets the game tables and writes a [`SeedPlan`](crate::plan::SeedPlan)
//! through any [`Store`](farmstead::store::Store).

mod seeder;

pub use seeder::{AccountReport, SeedError, SeedReport, Seeder};
