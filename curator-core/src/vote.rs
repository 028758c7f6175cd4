use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{CuratorError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub author: String,
    pub permalink: String,
    pub percent: i64,
    pub completed: bool,
    pub rejected: bool,
    pub addled: bool,
    pub date: Option<NaiveDateTime>,
}

pub struct VoteManager<'a> {
    conn: &'a Connection,
}

impl<'a> VoteManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Queue a vote on `author/permalink` and return its id.
    pub fn add(&self, user_id: i64, author: &str, permalink: &str, percent: i64) -> Result<i64> {
        if self.exists(author, permalink)? {
            return Err(CuratorError::VoteAlreadyExists {
                author: author.to_string(),
                permalink: permalink.to_string(),
            });
        }

        self.conn.execute(
            "INSERT INTO votes (user_id, author, permalink, percent) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, author, permalink, percent],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> Result<Option<Vote>> {
        let vote = self
            .conn
            .query_row(
                "SELECT id, user_id, author, permalink, percent, completed, rejected, addled, date
                 FROM votes WHERE id = ?1",
                params![id],
                row_to_vote,
            )
            .optional()?;
        Ok(vote)
    }

    pub fn exists(&self, author: &str, permalink: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM votes WHERE author = ?1 AND permalink = ?2)",
            params![author, permalink],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Returns false if no vote has that id.
    pub fn mark_completed(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("UPDATE votes SET completed = 1 WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

fn row_to_vote(row: &Row) -> rusqlite::Result<Vote> {
    Ok(Vote {
        id: row.get(0)?,
        user_id: row.get(1)?,
        author: row.get(2)?,
        permalink: row.get(3)?,
        percent: row.get(4)?,
        completed: row.get(5)?,
        rejected: row.get(6)?,
        addled: row.get(7)?,
        date: row.get(8)?,
    })
}
