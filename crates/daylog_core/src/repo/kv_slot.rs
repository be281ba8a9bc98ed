//! Durable key-value slots.
//!
//! # Responsibility
//! - Store one opaque serialized value per key.
//! - Replace a slot value in a single statement so readers never observe a
//!   partially written value.
//!
//! # Invariants
//! - `write` fully replaces the previous value of the key.
//! - `read` returns `None` for keys that were never written.

use crate::db::migrations::latest_version;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot key under which the whole review collection is stored.
pub const REVIEWS_SLOT_KEY: &str = "review_logs";

/// Minimal key-value storage contract used by collection stores.
pub trait KvSlot {
    /// Reads the raw value stored under `key`.
    fn read(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the raw value stored under `key`.
    fn write(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<S: KvSlot + ?Sized> KvSlot for &S {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write(key, value)
    }
}

/// SQLite-backed slot storage over the `kv_slots` table.
pub struct SqliteKvSlot<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvSlot<'conn> {
    /// Creates slot storage from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl KvSlot for SqliteKvSlot<'_> {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
