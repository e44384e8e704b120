//! Migrator Core - applies SQL migration files exactly once
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Migration entities, dialects, errors
//! - **ports**: Trait definitions for external dependencies (Database)
//! - **services**: Migration orchestration (MigrationService)
//! - **adapters**: Concrete implementations (SQLite, migrations directory)
//!
//! Any engine can be migrated by implementing [`ports::Database`]; SQLite
//! ships built in:
//!
//! ```no_run
//! use migrator_core::adapters::sqlite::SqliteDatabase;
//! use migrator_core::MigrationService;
//!
//! let mut db = SqliteDatabase::open(std::path::Path::new("app.sqlite"))?;
//! let report = MigrationService::new(&mut db)
//!     .with_directory("db/migrations")
//!     .migrate()?;
//! println!("applied {} migration(s)", report.applied.len());
//! # Ok::<(), migrator_core::Error>(())
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;

use adapters::sqlite::SqliteDatabase;
use config::MigratorConfig;

// Re-export commonly used types at crate root
pub use domain::result::{DatabaseError, Error, OperationResult, Result};
pub use domain::{
    AppliedMigration, Dialect, MigrationFile, MigrationRecord, MigrationReport, MigrationStatus,
};
pub use ports::Database;
pub use services::MigrationService;

/// Main context for CLI-style use
///
/// Holds the loaded configuration and the SQLite connection it points at.
pub struct MigratorContext {
    pub config: MigratorConfig,
    pub database: SqliteDatabase,
}

impl MigratorContext {
    /// Open the SQLite database named by the configuration
    pub fn new(config: MigratorConfig) -> Result<Self> {
        config.validate()?;
        let db_path = config.database.clone().ok_or_else(|| {
            Error::config("no database configured (set `database` or MIGRATOR_DATABASE)")
        })?;
        let database = SqliteDatabase::open(&db_path)?;
        Ok(Self { config, database })
    }

    /// Load configuration from `config_path` (or `migrator.json`) and open the database
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::new(MigratorConfig::load(config_path)?)
    }

    /// Migration service over this context's connection
    pub fn migration_service(&mut self) -> Result<MigrationService<'_, SqliteDatabase>> {
        MigrationService::from_config(&mut self.database, &self.config)
    }
}
