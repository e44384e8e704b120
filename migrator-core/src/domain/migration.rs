//! Migration entities

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A migration file found in the migrations directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Directory entry name, used as the migration identifier
    pub name: String,
    pub path: PathBuf,
}

impl MigrationFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A row of the bookkeeping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub id: i64,
    pub migration: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Applied/pending view of one migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStatus {
    pub name: String,
    pub applied: bool,
    pub applied_at: Option<NaiveDateTime>,
    /// False when the bookkeeping table has a record whose file is gone
    pub file_present: bool,
}

/// A migration committed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMigration {
    pub name: String,
    pub statements: usize,
}

/// Result of running migrations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Newly applied migrations, in application order
    pub applied: Vec<AppliedMigration>,
    /// Count of migrations that were already recorded
    pub already_applied: usize,
}

impl MigrationReport {
    pub fn applied_names(&self) -> Vec<&str> {
        self.applied.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Split migration text into trimmed, non-empty statements
///
/// Splitting is on the bare delimiter character: a delimiter inside a
/// string literal or comment still ends the statement.
pub fn split_statements(content: &str, delimiter: char) -> Vec<&str> {
    content
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a `created_at` value as returned by the supported engines
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_split_statements_trims_and_skips_empty() {
        let sql = "CREATE TABLE t (id INT);\n  INSERT INTO t VALUES (1);\n\n";
        assert_eq!(
            split_statements(sql, ';'),
            vec!["CREATE TABLE t (id INT)", "INSERT INTO t VALUES (1)"]
        );
    }

    #[test]
    fn test_split_statements_without_trailing_delimiter() {
        assert_eq!(
            split_statements("SELECT 1; SELECT 2", ';'),
            vec!["SELECT 1", "SELECT 2"]
        );
    }

    #[test]
    fn test_split_statements_blank_content() {
        assert!(split_statements("", ';').is_empty());
        assert!(split_statements("  ;\n ; \t;", ';').is_empty());
    }

    #[test]
    fn test_split_statements_custom_delimiter() {
        assert_eq!(
            split_statements("SELECT 1; SELECT 2 $ SELECT 3 $", '$'),
            vec!["SELECT 1; SELECT 2", "SELECT 3"]
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-01 12:30:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:05"), Some(expected));
        assert!(parse_timestamp("2024-03-01 12:30:05.123456").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_report_names() {
        let report = MigrationReport {
            applied: vec![
                AppliedMigration {
                    name: "001_a.sql".into(),
                    statements: 2,
                },
                AppliedMigration {
                    name: "003_c.sql".into(),
                    statements: 1,
                },
            ],
            already_applied: 1,
        };
        assert_eq!(report.applied_names(), vec!["001_a.sql", "003_c.sql"]);
        assert!(!report.is_empty());
        assert!(MigrationReport::default().is_empty());
    }
}
