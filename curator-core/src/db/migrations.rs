use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::version::{get_version, set_version};
use crate::error::MigrationError;

/// One schema change, applied when the database is exactly at `from_version`.
#[derive(Debug, Clone, Copy)]
pub struct MigrationStep {
    pub from_version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Every step ever shipped, in order. Append only: `MIGRATIONS[i].from_version == i`.
pub const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        from_version: 0,
        name: "001_initial",
        sql: include_str!("migrations/001_initial.sql"),
    },
    MigrationStep {
        from_version: 1,
        name: "002_referrals",
        sql: include_str!("migrations/002_referrals.sql"),
    },
    MigrationStep {
        from_version: 2,
        name: "003_rebuild_credentials",
        sql: include_str!("migrations/003_rebuild_credentials.sql"),
    },
    MigrationStep {
        from_version: 3,
        name: "004_unique_keys",
        sql: include_str!("migrations/004_unique_keys.sql"),
    },
    MigrationStep {
        from_version: 4,
        name: "005_curation",
        sql: include_str!("migrations/005_curation.sql"),
    },
];

/// Schema version reached once every step in [`MIGRATIONS`] has run.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// What a single run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    pub starting_version: u32,
    pub final_version: u32,
    pub applied: Vec<&'static str>,
}

impl MigrationOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Bring the schema up to date with the compiled-in catalog.
pub fn run(conn: &mut Connection) -> Result<MigrationOutcome, MigrationError> {
    run_steps(conn, MIGRATIONS)
}

/// Apply every step of `steps` reachable from the stored version inside one
/// transaction. Either all of them commit or the database is left untouched.
///
/// The transaction is IMMEDIATE so the write lock is held before the version
/// is read; a concurrent runner waits on the busy timeout and then sees the
/// committed version instead of applying the same step twice.
pub fn run_steps(
    conn: &mut Connection,
    steps: &[MigrationStep],
) -> Result<MigrationOutcome, MigrationError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(MigrationError::Begin)?;

    match apply_pending(&tx, steps) {
        Ok(outcome) => {
            tx.commit().map_err(MigrationError::Commit)?;
            if outcome.is_noop() {
                debug!(version = outcome.final_version, "schema up to date");
            } else {
                info!(
                    from = outcome.starting_version,
                    to = outcome.final_version,
                    "schema migrated"
                );
            }
            Ok(outcome)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(error = %rollback_err, "rollback after failed migration also failed");
            }
            Err(e)
        }
    }
}

fn apply_pending(
    tx: &Transaction<'_>,
    steps: &[MigrationStep],
) -> Result<MigrationOutcome, MigrationError> {
    let starting_version = get_version(tx)?;
    debug!(version = starting_version, "read schema version");

    let mut version = starting_version;
    let mut applied = Vec::new();

    while let Some(step) = steps.iter().find(|s| s.from_version == version) {
        info!(from_version = step.from_version, step = step.name, "applying migration");
        tx.execute_batch(step.sql)
            .map_err(|source| MigrationError::Step {
                from_version: step.from_version,
                name: step.name,
                source,
            })?;
        version += 1;
        set_version(tx, version)?;
        applied.push(step.name);
    }

    let known = steps.iter().map(|s| s.from_version + 1).max().unwrap_or(0);
    if version > known {
        warn!(
            version,
            latest = known,
            "database schema is newer than this build; leaving it untouched"
        );
    }

    Ok(MigrationOutcome {
        starting_version,
        final_version: version,
        applied,
    })
}
