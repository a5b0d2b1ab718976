//! Farmstead game data model.
//!
//! Entity records, credential hashing and the storage backends the game's
//! tooling writes through. The [`store::Store`] trait is the seam: the
//! Postgres implementation talks to a real database, the in-memory one
//! enforces the same constraints for tests.

pub mod auth;
pub mod errors;
pub mod models;
pub mod store;

/// Embedded schema migrations for the game database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
