//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The migration
//! service depends only on these traits, not on a concrete driver.

mod database;

pub use database::{Database, DbResult, Row};
