//! Database port - the connection abstraction the runner drives

use crate::domain::result::DatabaseError;

/// Result type for driver calls
pub type DbResult<T> = std::result::Result<T, DatabaseError>;

/// A single row, every column rendered as text (`None` for NULL)
pub type Row = Vec<Option<String>>;

/// Blocking database connection
///
/// Implementations wrap an already-open driver connection. All calls are
/// synchronous round trips; the runner holds the connection exclusively
/// (`&mut`) while it works, so implementations need no internal locking.
pub trait Database {
    /// Driver identifier used for dialect detection (`mysql`, `sqlite`, `pgsql`, ...)
    fn driver_name(&self) -> DbResult<String>;

    /// Execute a single statement that takes no parameters
    fn execute(&mut self, sql: &str) -> DbResult<()>;

    /// Execute a parameterized statement, returning the affected row count
    fn execute_with_params(&mut self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Run a query and return all rows
    fn query(&mut self, sql: &str) -> DbResult<Vec<Row>>;

    fn begin(&mut self) -> DbResult<()>;

    fn commit(&mut self) -> DbResult<()>;

    fn rollback(&mut self) -> DbResult<()>;
}
