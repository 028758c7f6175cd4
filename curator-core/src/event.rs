use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kinds of periodic bot activity. The schema seeds one row of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Post,
    Reward,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Post => "POST",
            EventKind::Reward => "REWARD",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub kind: EventKind,
    pub date: Option<NaiveDateTime>,
}

pub struct EventLog<'a> {
    conn: &'a Connection,
}

impl<'a> EventLog<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn record(&self, kind: EventKind) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO events (type) VALUES (?1)",
            params![kind.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn latest(&self, kind: EventKind) -> Result<Option<Event>> {
        let event = self
            .conn
            .query_row(
                "SELECT id, date FROM events WHERE type = ?1 ORDER BY id DESC LIMIT 1",
                params![kind.as_str()],
                |row| {
                    Ok(Event {
                        id: row.get(0)?,
                        kind,
                        date: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_seeded_rows_then_record() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::migrations::run(&mut conn).unwrap();
        let log = EventLog::new(&conn);

        let seeded_post = log.latest(EventKind::Post).unwrap().unwrap();
        let seeded_reward = log.latest(EventKind::Reward).unwrap().unwrap();
        assert!(seeded_post.id < seeded_reward.id);
        assert!(seeded_post.date.is_some());

        let id = log.record(EventKind::Post).unwrap();
        assert_eq!(log.latest(EventKind::Post).unwrap().unwrap().id, id);
        assert_eq!(log.latest(EventKind::Reward).unwrap().unwrap().id, seeded_reward.id);
    }

    #[test]
    fn test_latest_on_empty_table_is_none() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::migrations::run(&mut conn).unwrap();
        conn.execute("DELETE FROM events", []).unwrap();

        assert!(EventLog::new(&conn).latest(EventKind::Reward).unwrap().is_none());
    }

    #[test]
    fn test_kind_serializes_as_stored_value() {
        let json = serde_json::to_string(&EventKind::Reward).unwrap();
        assert_eq!(json, "\"REWARD\"");
    }
}
