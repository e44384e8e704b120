//! Configuration management
//!
//! Settings come from an optional `migrator.json` file:
//! ```json
//! { "table": "migrations", "directory": "migrations", "delimiter": ";", "database": "app.sqlite" }
//! ```
//! Environment variables (`MIGRATOR_TABLE`, `MIGRATOR_DIR`, `MIGRATOR_DATABASE`)
//! override the file; callers apply their own overrides on top.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Default settings file name
pub const CONFIG_FILE: &str = "migrator.json";

pub const DEFAULT_TABLE: &str = "migrations";
pub const DEFAULT_DIRECTORY: &str = "migrations";
pub const DEFAULT_DELIMITER: char = ';';

/// Migrator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigratorConfig {
    /// Bookkeeping table name
    pub table: String,
    /// Directory holding the migration files
    pub directory: PathBuf,
    /// Statement delimiter inside migration files
    pub delimiter: char,
    /// SQLite database file used by the CLI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            delimiter: DEFAULT_DELIMITER,
            database: None,
        }
    }
}

impl MigratorConfig {
    /// Load config from a settings file (if it exists) plus environment overrides
    ///
    /// With `None`, `migrator.json` in the current directory is tried.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE));

        let config = if path.exists() {
            Self::from_file(path)?
        } else if config_path.is_some() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        } else {
            Self::default()
        };

        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a settings file without applying overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(table) = lookup("MIGRATOR_TABLE").filter(|v| !v.is_empty()) {
            self.table = table;
        }
        if let Some(dir) = lookup("MIGRATOR_DIR").filter(|v| !v.is_empty()) {
            self.directory = PathBuf::from(dir);
        }
        if let Some(db) = lookup("MIGRATOR_DATABASE").filter(|v| !v.is_empty()) {
            self.database = Some(PathBuf::from(db));
        }
        self
    }

    /// Check values that end up interpolated into SQL
    pub fn validate(&self) -> Result<()> {
        if !identifier_regex().is_match(&self.table) {
            return Err(Error::config(format!(
                "invalid table name '{}': expected an identifier \
                 such as 'migrations' or 'app.migrations'",
                self.table
            )));
        }
        if self.delimiter.is_whitespace() {
            return Err(Error::config("statement delimiter cannot be whitespace"));
        }
        Ok(())
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("identifier regex is valid")
    })
}
