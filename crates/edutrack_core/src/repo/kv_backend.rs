//! Key-value blob backends.
//!
//! # Responsibility
//! - Read and overwrite opaque string values under string keys.
//! - Provide a SQLite implementation for real use and an in-memory one for
//!   tests.
//!
//! # Invariants
//! - `write` replaces the whole value in one statement.
//! - `read` of a missing key is `Ok(None)`, never an error.

use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Durable storage for opaque values.
pub trait KvBackend {
    fn read(&self, key: &str) -> RepoResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<T: KvBackend + ?Sized> KvBackend for &T {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write(key, value)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
///
/// The connection must come from `db::open_db*` so `kv_entries` exists.
pub struct SqliteKvBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvBackend<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvBackend for SqliteKvBackend<'_> {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local backend. Not `Sync`; one writer at a time.
#[derive(Debug, Default)]
pub struct MemoryKvBackend {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = Self::default();
        backend
            .entries
            .borrow_mut()
            .insert(key.into(), value.into());
        backend
    }
}

impl KvBackend for MemoryKvBackend {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
