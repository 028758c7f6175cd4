use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{CuratorError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub id: i64,
    pub user_id: i64,
    pub referrer: String,
    pub referral: String,
    pub completed: bool,
}

pub struct ReferralManager<'a> {
    conn: &'a Connection,
}

impl<'a> ReferralManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Record that `user_id` joined through `referrer`. A user can be
    /// referred only once.
    pub fn add(&self, user_id: i64, referrer: &str, referral: &str) -> Result<i64> {
        if self.get_by_user(user_id)?.is_some() {
            return Err(CuratorError::ReferralAlreadyExists { user_id });
        }

        self.conn.execute(
            "INSERT INTO referrals (user_id, referrer, referral, completed) VALUES (?1, ?2, ?3, 0)",
            params![user_id, referrer, referral],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_by_user(&self, user_id: i64) -> Result<Option<Referral>> {
        let referral = self
            .conn
            .query_row(
                "SELECT id, user_id, referrer, COALESCE(referral, ''), completed
                 FROM referrals WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(Referral {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        referrer: row.get(2)?,
                        referral: row.get(3)?,
                        completed: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(referral)
    }

    pub fn complete(&self, user_id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE referrals SET completed = 1 WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(affected > 0)
    }
}
