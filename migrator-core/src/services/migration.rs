//! Migration service - applies migration files from a directory
//!
//! Every file in the migrations directory is applied exactly once, inside
//! its own transaction, and recorded in a bookkeeping table so later runs
//! skip it.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::adapters::directory::MigrationDirectory;
use crate::config::{MigratorConfig, DEFAULT_DELIMITER, DEFAULT_DIRECTORY, DEFAULT_TABLE};
use crate::domain::result::{DatabaseError, Error, Result};
use crate::domain::{
    parse_timestamp, split_statements, AppliedMigration, Dialect, MigrationFile, MigrationRecord,
    MigrationReport, MigrationStatus,
};
use crate::ports::Database;
use crate::services::transaction::Transaction;

/// Service for applying database migrations
///
/// The service borrows the connection exclusively for its lifetime. It takes
/// no database-level lock: running two services against the same database at
/// the same time is unsupported and must be prevented by the caller.
pub struct MigrationService<'a, D: Database + ?Sized> {
    db: &'a mut D,
    table: String,
    directory: MigrationDirectory,
    delimiter: char,
}

impl<'a, D: Database + ?Sized> MigrationService<'a, D> {
    /// Create a service with the default table (`migrations`) and directory (`migrations`)
    pub fn new(db: &'a mut D) -> Self {
        Self {
            db,
            table: DEFAULT_TABLE.to_string(),
            directory: MigrationDirectory::new(DEFAULT_DIRECTORY),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Create a service from validated configuration
    pub fn from_config(db: &'a mut D, config: &MigratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            db,
            table: config.table.clone(),
            directory: MigrationDirectory::new(&config.directory),
            delimiter: config.delimiter,
        })
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = MigrationDirectory::new(directory);
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Detect the dialect of the connected database
    pub fn dialect(&self) -> Result<Dialect> {
        let driver = self.db.driver_name()?;
        Dialect::from_driver_name(&driver).ok_or(Error::UnsupportedDialect { driver })
    }

    /// Create the bookkeeping table if it doesn't exist
    ///
    /// Returns the detected dialect. Fails before issuing any DDL when the
    /// dialect is not supported.
    pub fn ensure_table(&mut self) -> Result<Dialect> {
        let dialect = self.dialect()?;
        info!(
            dialect = %dialect,
            table = %self.table,
            "Creating migrations table (if not exists)"
        );
        self.db.execute(&dialect.create_table_sql(&self.table))?;
        Ok(dialect)
    }

    /// Whether the bookkeeping table exists, without creating it
    pub fn table_exists(&mut self) -> Result<bool> {
        let dialect = self.dialect()?;
        let rows = self.db.query(&dialect.table_exists_sql(&self.table))?;
        Ok(!rows.is_empty())
    }

    /// Get names of already applied migrations
    pub fn get_applied(&mut self) -> Result<Vec<String>> {
        let rows = self
            .db
            .query(&format!("SELECT migration FROM {}", self.table))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().flatten())
            .collect())
    }

    /// Get all bookkeeping records in application order
    pub fn applied_records(&mut self) -> Result<Vec<MigrationRecord>> {
        let rows = self.db.query(&format!(
            "SELECT id, migration, created_at FROM {} ORDER BY id",
            self.table
        ))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut columns = row.into_iter();
            let id = columns.next().flatten().unwrap_or_default();
            let id = id.parse::<i64>().map_err(|_| {
                DatabaseError::new(format!("unexpected id value '{}' in {}", id, self.table))
            })?;
            let migration = columns.next().flatten().unwrap_or_default();
            let created_at = columns.next().flatten().as_deref().and_then(parse_timestamp);

            records.push(MigrationRecord {
                id,
                migration,
                created_at,
            });
        }
        Ok(records)
    }

    /// Get migration files not yet recorded, sorted by name
    pub fn pending_migrations(&mut self) -> Result<Vec<MigrationFile>> {
        let (pending, _) = self.plan()?;
        Ok(pending)
    }

    /// Applied/pending state of every known migration, sorted by name
    ///
    /// Includes records whose file has since been removed from the directory.
    /// Issues no DDL: a missing bookkeeping table means nothing is applied.
    pub fn status(&mut self) -> Result<Vec<MigrationStatus>> {
        let files = self.directory.list()?;
        let records = if self.table_exists()? {
            self.applied_records()?
        } else {
            debug!(table = %self.table, "Migrations table does not exist yet");
            Vec::new()
        };

        let mut statuses: BTreeMap<String, MigrationStatus> = files
            .into_iter()
            .map(|file| {
                let status = MigrationStatus {
                    name: file.name.clone(),
                    applied: false,
                    applied_at: None,
                    file_present: true,
                };
                (file.name, status)
            })
            .collect();

        for record in records {
            let status = statuses
                .entry(record.migration.clone())
                .or_insert_with(|| MigrationStatus {
                    name: record.migration.clone(),
                    applied: false,
                    applied_at: None,
                    file_present: false,
                });
            if !status.applied {
                status.applied = true;
                status.applied_at = record.created_at;
            }
        }

        Ok(statuses.into_values().collect())
    }

    /// Run all pending migrations
    ///
    /// This is the main entry point. It:
    /// 1. Ensures the bookkeeping table exists
    /// 2. Diffs the migrations directory against the recorded names
    /// 3. Applies each pending file in its own transaction, in name order
    /// 4. Records each applied file in the same transaction
    ///
    /// The first failing file is rolled back and ends the run; files after
    /// it stay pending. Re-running is safe.
    pub fn migrate(&mut self) -> Result<MigrationReport> {
        let dialect = self.ensure_table()?;

        info!("Checking for new migrations");
        let (pending, already_applied) = self.plan()?;

        let mut report = MigrationReport {
            applied: Vec::new(),
            already_applied,
        };

        if pending.is_empty() {
            info!("No new migrations found");
            return Ok(report);
        }

        info!(count = pending.len(), "Found new migration(s)");

        for file in &pending {
            let statements = self.apply(dialect, file)?;
            report.applied.push(AppliedMigration {
                name: file.name.clone(),
                statements,
            });
        }

        Ok(report)
    }

    /// Pending files plus the number of recorded migrations
    fn plan(&mut self) -> Result<(Vec<MigrationFile>, usize)> {
        let files = self.directory.list()?;
        let applied: HashSet<String> = self.get_applied()?.into_iter().collect();

        let pending = files
            .into_iter()
            .filter(|file| !applied.contains(&file.name))
            .collect();

        Ok((pending, applied.len()))
    }

    /// Apply one file atomically, returning the number of statements executed
    fn apply(&mut self, dialect: Dialect, file: &MigrationFile) -> Result<usize> {
        info!(migration = %file.name, "Migrating");

        let insert_sql = dialect.insert_record_sql(&self.table);
        let mut tx = Transaction::begin(&mut *self.db)
            .map_err(|source| execution_error(file, source))?;

        let result = self
            .directory
            .read(file)
            .and_then(|content| execute_file(&mut tx, file, &content, self.delimiter, &insert_sql));

        match result {
            Ok(count) => {
                tx.commit().map_err(|source| execution_error(file, source))?;
                info!(migration = %file.name, statements = count, "Migrated");
                Ok(count)
            }
            Err(err) => {
                warn!(migration = %file.name, error = %err, "Migration failed, rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    error!(migration = %file.name, error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// Execute a file's statements and its bookkeeping insert inside `tx`
fn execute_file<D: Database + ?Sized>(
    tx: &mut Transaction<'_, D>,
    file: &MigrationFile,
    content: &str,
    delimiter: char,
    insert_sql: &str,
) -> Result<usize> {
    let statements = split_statements(content, delimiter);
    if statements.is_empty() {
        return Err(Error::EmptyMigration {
            migration: file.name.clone(),
        });
    }

    for (index, statement) in statements.iter().enumerate() {
        debug!(migration = %file.name, index = index + 1, "Executing statement");
        tx.execute(statement)
            .map_err(|source| execution_error(file, source))?;
    }

    tx.execute_with_params(insert_sql, &[file.name.as_str()])
        .map_err(|source| execution_error(file, source))?;

    Ok(statements.len())
}

fn execution_error(file: &MigrationFile, source: DatabaseError) -> Error {
    Error::MigrationExecution {
        migration: file.name.clone(),
        source,
    }
}
