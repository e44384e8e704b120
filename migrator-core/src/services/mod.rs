//! Service layer - migration orchestration
//!
//! Services coordinate domain logic and port interactions.

pub mod migration;
mod transaction;

pub use migration::MigrationService;
