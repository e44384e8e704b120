//! Database dialects and their bookkeeping-table DDL

use std::fmt;

/// Supported database engine families
///
/// Each variant carries the column types used for the bookkeeping table
/// and the placeholder syntax of its driver. New engines are added as new
/// variants, dispatch stays in [`Dialect::from_driver_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Map a driver name reported by the connection to a dialect
    ///
    /// Accepts the short driver identifiers (`mysql`, `sqlite`, `pgsql`) as
    /// well as the common long forms. Matching is case-insensitive.
    pub fn from_driver_name(driver: &str) -> Option<Self> {
        match driver.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            "pgsql" | "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
            Self::Postgres => "PostgreSQL",
        }
    }

    fn id_column(&self) -> &'static str {
        match self {
            Self::MySql => "INT AUTO_INCREMENT PRIMARY KEY",
            Self::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
            Self::Postgres => "SERIAL PRIMARY KEY",
        }
    }

    fn migration_column(&self) -> &'static str {
        match self {
            Self::MySql | Self::Postgres => "VARCHAR(255)",
            Self::Sqlite => "TEXT",
        }
    }

    /// Positional parameter placeholder (1-based)
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::MySql | Self::Sqlite => "?".to_string(),
            Self::Postgres => format!("${}", index),
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for the bookkeeping table
    pub fn create_table_sql(&self, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id {},
                migration {},
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            table,
            self.id_column(),
            self.migration_column()
        )
    }

    /// Insert statement recording one applied migration
    pub fn insert_record_sql(&self, table: &str) -> String {
        format!(
            "INSERT INTO {} (migration) VALUES ({})",
            table,
            self.placeholder(1)
        )
    }

    /// Catalog query returning a row when `table` exists
    ///
    /// An unqualified name is looked up in the connection's current schema.
    pub fn table_exists_sql(&self, table: &str) -> String {
        let (schema, name) = match table.rsplit_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (None, table),
        };
        let name = quote_literal(name);

        match self {
            Self::Sqlite => format!(
                "SELECT name FROM {}sqlite_master WHERE type = 'table' AND name = {}",
                schema.map(|s| format!("{}.", s)).unwrap_or_default(),
                name
            ),
            Self::MySql | Self::Postgres => {
                let current = if *self == Self::MySql {
                    "DATABASE()"
                } else {
                    "current_schema()"
                };
                format!(
                    "SELECT table_name FROM information_schema.tables \
                     WHERE table_schema = {} AND table_name = {}",
                    schema.map(quote_literal).unwrap_or_else(|| current.to_string()),
                    name
                )
            }
        }
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
