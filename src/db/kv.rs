use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

/// Durable key-value storage on top of the `kv_store` table. Every write is
/// its own autocommit statement, so a successful return means the value is on
/// disk.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wrap a connection previously prepared by [`super::ensure_schema`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(deleted > 0)
    }

    /// Compares the raw prefix with `substr` instead of `LIKE` so nicknames
    /// containing `%` or `_` are not treated as wildcards.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv_store
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key",
        )?;

        let keys = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(keys)
    }
}
