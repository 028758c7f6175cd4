//! The schema version lives in the database header (`PRAGMA user_version`),
//! so it exists before any table does and needs no bookkeeping table.
//!
//! Both accessors work inside the caller's transaction and never commit or
//! roll back themselves.

use rusqlite::Transaction;

use crate::error::MigrationError;

pub fn get_version(tx: &Transaction<'_>) -> Result<u32, MigrationError> {
    tx.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))
        .map_err(MigrationError::VersionRead)
}

pub fn set_version(tx: &Transaction<'_>, version: u32) -> Result<(), MigrationError> {
    tx.pragma_update(None, "user_version", version)
        .map_err(|source| MigrationError::VersionWrite { version, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_fresh_database_reports_zero() {
        let mut conn = Connection::open_in_memory().unwrap();
        let tx = conn.transaction().unwrap();
        assert_eq!(get_version(&tx).unwrap(), 0);
    }

    #[test]
    fn test_set_then_get_within_transaction() {
        let mut conn = Connection::open_in_memory().unwrap();
        let tx = conn.transaction().unwrap();
        set_version(&tx, 7).unwrap();
        assert_eq!(get_version(&tx).unwrap(), 7);
        tx.commit().unwrap();

        let tx = conn.transaction().unwrap();
        assert_eq!(get_version(&tx).unwrap(), 7);
    }

    #[test]
    fn test_write_is_discarded_on_rollback() {
        let mut conn = Connection::open_in_memory().unwrap();
        let tx = conn.transaction().unwrap();
        set_version(&tx, 3).unwrap();
        tx.rollback().unwrap();

        let tx = conn.transaction().unwrap();
        assert_eq!(get_version(&tx).unwrap(), 0);
    }

    #[test]
    fn test_negative_version_is_read_error() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = -1").unwrap();

        let tx = conn.transaction().unwrap();
        let err = get_version(&tx).unwrap_err();
        assert!(matches!(err, MigrationError::VersionRead(_)));
    }
}
