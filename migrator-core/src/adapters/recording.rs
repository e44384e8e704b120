//! Recording database for testing
//!
//! Implements the Database port in memory so dialect paths that have no
//! embedded engine (MySQL, PostgreSQL, unknown drivers) can be exercised.
//! Every call is appended to `log`; committed migration names are kept in
//! `records` and served back for `SELECT migration ...` queries.

use crate::domain::result::DatabaseError;
use crate::ports::{Database, DbResult, Row};

/// In-memory Database double that records every call
#[derive(Debug, Default)]
pub struct RecordingDatabase {
    pub driver: String,
    pub log: Vec<String>,
    /// Committed bookkeeping entries
    pub records: Vec<String>,
    /// Statements containing this text fail
    pub fail_on: Option<String>,
    /// `COMMIT` fails and leaves the transaction open
    pub fail_commit: bool,
    pending_records: Vec<String>,
    in_transaction: bool,
}

impl RecordingDatabase {
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Logged calls starting with `prefix`
    pub fn calls(&self, prefix: &str) -> Vec<&str> {
        self.log
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    fn check(&self, sql: &str) -> DbResult<()> {
        match &self.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => {
                Err(DatabaseError::new(format!("simulated failure: {}", sql)).with_code("42000"))
            }
            _ => Ok(()),
        }
    }
}

impl Database for RecordingDatabase {
    fn driver_name(&self) -> DbResult<String> {
        Ok(self.driver.clone())
    }

    fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.log.push(format!("EXECUTE {}", sql));
        self.check(sql)
    }

    fn execute_with_params(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.log.push(format!("PARAMS {} {:?}", sql, params));
        self.check(sql)?;
        self.pending_records
            .extend(params.iter().map(|p| p.to_string()));
        if !self.in_transaction {
            self.records.append(&mut self.pending_records);
        }
        Ok(1)
    }

    fn query(&mut self, sql: &str) -> DbResult<Vec<Row>> {
        self.log.push(format!("QUERY {}", sql));
        self.check(sql)?;
        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if sql.contains("created_at") {
                    vec![
                        Some((i + 1).to_string()),
                        Some(name.clone()),
                        Some("2024-01-01 00:00:00".to_string()),
                    ]
                } else {
                    vec![Some(name.clone())]
                }
            })
            .collect())
    }

    fn begin(&mut self) -> DbResult<()> {
        self.log.push("BEGIN".to_string());
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> DbResult<()> {
        self.log.push("COMMIT".to_string());
        if self.fail_commit {
            return Err(DatabaseError::new("simulated commit failure").with_code("40001"));
        }
        self.in_transaction = false;
        self.records.append(&mut self.pending_records);
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        self.log.push("ROLLBACK".to_string());
        self.in_transaction = false;
        self.pending_records.clear();
        Ok(())
    }
}
