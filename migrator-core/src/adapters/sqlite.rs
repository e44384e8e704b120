//! SQLite implementation of the Database port

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};

use crate::domain::result::{DatabaseError, Result};
use crate::ports::{Database, DbResult, Row};

/// How long a statement waits on a locked database file before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database backed by `rusqlite`
pub struct SqliteDatabase {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteDatabase {
    /// Open (or create) a database file
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(to_database_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(to_database_error)?;
        Ok(Self {
            conn,
            db_path: Some(db_path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(to_database_error)?;
        Ok(Self {
            conn,
            db_path: None,
        })
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Database for SqliteDatabase {
    fn driver_name(&self) -> DbResult<String> {
        Ok("sqlite".to_string())
    }

    fn execute(&mut self, sql: &str) -> DbResult<()> {
        // execute_batch tolerates statements that return rows (PRAGMA, SELECT)
        self.conn.execute_batch(sql).map_err(to_database_error)
    }

    fn execute_with_params(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(to_database_error)
    }

    fn query(&mut self, sql: &str) -> DbResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql).map_err(to_database_error)?;
        let column_count = stmt.column_count();

        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(value_to_string(row.get_ref(i)?));
                }
                Ok(values)
            })
            .map_err(to_database_error)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(to_database_error)?);
        }
        Ok(result)
    }

    fn begin(&mut self) -> DbResult<()> {
        self.conn.execute_batch("BEGIN").map_err(to_database_error)
    }

    fn commit(&mut self) -> DbResult<()> {
        self.conn.execute_batch("COMMIT").map_err(to_database_error)
    }

    fn rollback(&mut self) -> DbResult<()> {
        self.conn.execute_batch("ROLLBACK").map_err(to_database_error)
    }
}

fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Convert a rusqlite error, keeping SQLite's extended result code
fn to_database_error(err: rusqlite::Error) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(ffi_err, message) => {
            let message = message.clone().unwrap_or_else(|| ffi_err.to_string());
            DatabaseError::new(message).with_code(ffi_err.extended_code.to_string())
        }
        _ => DatabaseError::new(err.to_string()),
    }
}
