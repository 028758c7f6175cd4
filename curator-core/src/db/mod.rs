pub mod migrations;
pub mod version;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::config::DatabaseConfig;
use crate::db::migrations::MigrationOutcome;
use crate::error::{CuratorError, Result};

/// Open (or create) the database with the default settings and bring its
/// schema up to date. On error the connection is dropped.
pub fn open_database(path: &Path) -> Result<Connection> {
    let config = DatabaseConfig {
        path: path.to_path_buf(),
        ..DatabaseConfig::default()
    };
    let (conn, _) = open_database_with(&config)?;
    Ok(conn)
}

/// Same as [`open_database`], also reporting which migrations ran.
pub fn open_database_with(config: &DatabaseConfig) -> Result<(Connection, MigrationOutcome)> {
    let mut conn = connect(config)?;
    let outcome = migrations::run(&mut conn)?;
    Ok((conn, outcome))
}

/// Open the database with WAL mode enabled, without touching the schema.
pub fn connect(config: &DatabaseConfig) -> Result<Connection> {
    let wrap = |source| CuratorError::Connection {
        path: config.path.clone(),
        source,
    };
    let conn = Connection::open(&config.path).map_err(wrap)?;
    conn.pragma_update(None, "journal_mode", "wal").map_err(wrap)?;
    conn.pragma_update(None, "foreign_keys", "on").map_err(wrap)?;
    conn.pragma_update(None, "busy_timeout", config.busy_timeout_ms)
        .map_err(wrap)?;
    Ok(conn)
}

/// Open a database that must already exist, leaving the file, its journal
/// mode and its schema as they are.
pub fn open_existing(config: &DatabaseConfig) -> Result<Connection> {
    let wrap = |source| CuratorError::Connection {
        path: config.path.clone(),
        source,
    };
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(&config.path, flags).map_err(wrap)?;
    conn.pragma_update(None, "busy_timeout", config.busy_timeout_ms)
        .map_err(wrap)?;
    Ok(conn)
}

/// Current schema version and user tables, read without migrating.
pub fn schema_status(conn: &mut Connection) -> Result<(u32, Vec<String>)> {
    let tx = conn.transaction()?;
    let version = version::get_version(&tx)?;
    let tables = {
        let mut stmt = tx.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<String>, _>>()?
    };
    tx.commit()?;
    Ok((version, tables))
}
