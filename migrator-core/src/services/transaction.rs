//! Scoped transaction over the Database port

use tracing::{error, warn};

use crate::ports::{Database, DbResult};

/// An open transaction that rolls back unless committed
///
/// Dropping an uncommitted guard issues `ROLLBACK`, so every early return
/// (`?`, panics, failed commits) leaves the connection outside a transaction.
pub(crate) struct Transaction<'t, D: Database + ?Sized> {
    db: &'t mut D,
    active: bool,
}

impl<'t, D: Database + ?Sized> Transaction<'t, D> {
    pub(crate) fn begin(db: &'t mut D) -> DbResult<Self> {
        db.begin()?;
        Ok(Self { db, active: true })
    }

    pub(crate) fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.db.execute(sql)
    }

    pub(crate) fn execute_with_params(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.db.execute_with_params(sql, params)
    }

    pub(crate) fn commit(mut self) -> DbResult<()> {
        self.db.commit()?;
        self.active = false;
        Ok(())
    }

    pub(crate) fn rollback(mut self) -> DbResult<()> {
        self.active = false;
        self.db.rollback()
    }
}

impl<D: Database + ?Sized> Drop for Transaction<'_, D> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        warn!("Transaction dropped without commit, rolling back");
        if let Err(e) = self.db.rollback() {
            error!(error = %e, "Rollback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::recording::RecordingDatabase;

    #[test]
    fn test_commit_does_not_roll_back() {
        let mut db = RecordingDatabase::new("sqlite");
        let mut tx = Transaction::begin(&mut db).unwrap();
        tx.execute("CREATE TABLE t (id INT)").unwrap();
        tx.commit().unwrap();

        assert_eq!(db.log, vec!["BEGIN", "EXECUTE CREATE TABLE t (id INT)", "COMMIT"]);
    }

    #[test]
    fn test_drop_rolls_back() {
        let mut db = RecordingDatabase::new("sqlite");
        {
            let mut tx = Transaction::begin(&mut db).unwrap();
            tx.execute("INSERT INTO t VALUES (1)").unwrap();
        }

        assert_eq!(db.log.last().map(String::as_str), Some("ROLLBACK"));
        assert!(!db.in_transaction());
    }

    #[test]
    fn test_explicit_rollback_runs_once() {
        let mut db = RecordingDatabase::new("sqlite");
        let tx = Transaction::begin(&mut db).unwrap();
        tx.rollback().unwrap();

        assert_eq!(db.calls("ROLLBACK").len(), 1);
    }
}
