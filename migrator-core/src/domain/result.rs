//! Result and error types for the core library

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by a database driver behind the [`Database`](crate::ports::Database) port
///
/// Keeps the driver's message and, when the driver has one, its error code
/// (SQLSTATE for PostgreSQL/MySQL, extended result code for SQLite).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    pub message: String,
    pub code: Option<String>,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for DatabaseError {}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported database dialect: {driver}")]
    UnsupportedDialect { driver: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Migration {migration} contains no statements")]
    EmptyMigration { migration: String },

    #[error("Migration {migration} failed: {source}")]
    MigrationExecution {
        migration: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Cannot read migration {migration}: {source}")]
    ReadMigration {
        migration: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read migrations directory {}: {source}", path.display())]
    MigrationsDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid migration file name: {0}")]
    InvalidFileName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Name of the migration file this error is about, if any
    pub fn migration(&self) -> Option<&str> {
        match self {
            Self::EmptyMigration { migration }
            | Self::MigrationExecution { migration, .. }
            | Self::ReadMigration { migration, .. } => Some(migration),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => match e.migration() {
                Some(name) => {
                    let mut context = HashMap::new();
                    context.insert("migration".to_string(), serde_json::Value::from(name));
                    Self::fail_with_context(e.to_string(), context)
                }
                None => Self::fail(e.to_string()),
            },
        }
    }
}
