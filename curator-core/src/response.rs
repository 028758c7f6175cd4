use rusqlite::{params, Connection};

use crate::error::Result;

/// A user's answer to a queued vote. One answer per (user, vote).
pub struct ResponseManager<'a> {
    conn: &'a Connection,
}

impl<'a> ResponseManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, user_id: i64, vote_id: i64, result: bool) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO responses (user_id, vote_id, result) VALUES (?1, ?2, ?3)",
            params![user_id, vote_id, result],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn exists(&self, user_id: i64, vote_id: i64) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM responses WHERE user_id = ?1 AND vote_id = ?2)",
            params![user_id, vote_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::error::CuratorError;

    #[test]
    fn test_one_response_per_user_and_vote() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::migrations::run(&mut conn).unwrap();
        let mgr = ResponseManager::new(&conn);

        assert!(!mgr.exists(1, 10).unwrap());
        mgr.add(1, 10, true).unwrap();
        assert!(mgr.exists(1, 10).unwrap());
        assert!(!mgr.exists(2, 10).unwrap());

        let err = mgr.add(1, 10, false).unwrap_err();
        assert!(matches!(err, CuratorError::Database(_)));
        mgr.add(2, 10, false).unwrap();
    }
}
