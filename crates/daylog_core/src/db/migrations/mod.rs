//! Ordered schema steps for the slot table.
//!
//! Step 1 creates `kv_slots(key, value, updated_at)`. Later steps append to
//! `STEPS` with the next version number; existing steps are never edited,
//! since their SQL has already run on user devices.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[Step {
    version: 1,
    name: "create_kv_slots",
    sql: include_str!("0001_init.sql"),
}];

/// Slot schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings the slot table up to [`latest_version`].
///
/// All pending steps share one transaction, so a failure leaves the file at
/// its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        log::debug!(
            "event=db_migrate_step module=db version={} name={}",
            step.version,
            step.name
        );
    }
    tx.commit()?;

    log::info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={}",
        pending.len()
    );
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
