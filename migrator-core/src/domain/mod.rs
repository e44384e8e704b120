//! Core domain entities
//!
//! Pure data structures and helpers for migrations and dialects - no I/O.

mod dialect;
mod migration;
pub mod result;

pub use dialect::Dialect;
pub use migration::{
    parse_timestamp, split_statements, AppliedMigration, MigrationFile, MigrationRecord,
    MigrationReport, MigrationStatus,
};
