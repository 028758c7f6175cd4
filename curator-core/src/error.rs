use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single migration run. The run's transaction has been rolled
/// back by the time one of these reaches the caller.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("could not begin migration transaction: {0}")]
    Begin(#[source] rusqlite::Error),

    #[error("could not read schema version: {0}")]
    VersionRead(#[source] rusqlite::Error),

    #[error("could not write schema version {version}: {source}")]
    VersionWrite {
        version: u32,
        #[source]
        source: rusqlite::Error,
    },

    #[error("migration from version {from_version} ({name}) failed: {source}")]
    Step {
        from_version: u32,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("could not commit migrations: {0}")]
    Commit(#[source] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum CuratorError {
    #[error("could not open database at {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("schema migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("vote already exists: {author}/{permalink}")]
    VoteAlreadyExists { author: String, permalink: String },

    #[error("referral already exists for user {user_id}")]
    ReferralAlreadyExists { user_id: i64 },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CuratorError>;
