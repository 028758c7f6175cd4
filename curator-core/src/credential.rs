use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A bot user's account link and voting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub user_id: i64,
    pub user_name: String,
    pub power: i64,
    pub active: bool,
    pub curates: bool,
    pub chat_id: i64,
}

pub struct CredentialManager<'a> {
    conn: &'a Connection,
}

impl<'a> CredentialManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace the row keyed by `user_id`.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO credentials (user_id, user_name, power, active, curates, chat_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                credential.user_id,
                credential.user_name,
                credential.power,
                credential.active,
                credential.curates,
                credential.chat_id,
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, user_id: i64) -> Result<Option<Credential>> {
        let credential = self
            .conn
            .query_row(
                "SELECT user_id, user_name, power, active, curates, chat_id
                 FROM credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(Credential {
                        user_id: row.get(0)?,
                        user_name: row.get(1)?,
                        power: row.get(2)?,
                        active: row.get(3)?,
                        curates: row.get(4)?,
                        chat_id: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(credential)
    }

    pub fn exists(&self, user_id: i64) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM credentials WHERE user_id = ?1)",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn set_active(&self, user_id: i64, active: bool) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE credentials SET active = ?1 WHERE user_id = ?2",
            params![active, user_id],
        )?;
        Ok(affected > 0)
    }
}
