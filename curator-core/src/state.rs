use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;

/// Pending conversational action per user (what the bot expects next).
pub struct StateManager<'a> {
    conn: &'a Connection,
}

impl<'a> StateManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, user_id: i64) -> Result<Option<String>> {
        let action = self
            .conn
            .query_row(
                "SELECT action FROM states WHERE user_id = ?1",
                params![user_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(action.flatten())
    }

    pub fn set(&self, user_id: i64, action: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO states (user_id, action) VALUES (?1, ?2)",
            params![user_id, action],
        )?;
        Ok(())
    }

    pub fn clear(&self, user_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM states WHERE user_id = ?1", params![user_id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_set_get_clear() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::migrations::run(&mut conn).unwrap();
        let mgr = StateManager::new(&conn);

        assert_eq!(mgr.get(3).unwrap(), None);
        mgr.set(3, "awaiting_link").unwrap();
        assert_eq!(mgr.get(3).unwrap().as_deref(), Some("awaiting_link"));
        mgr.set(3, "awaiting_percent").unwrap();
        assert_eq!(mgr.get(3).unwrap().as_deref(), Some("awaiting_percent"));
        mgr.clear(3).unwrap();
        assert_eq!(mgr.get(3).unwrap(), None);
    }
}
