//! Key-value reads and writes.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, params};

use crate::error::{PlannerError, Result, StorageResultExt};

const SELECT_VALUE_SQL: &str = "SELECT value, updated_at FROM kv_store WHERE key = ?1";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_VALUE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

/// A stored value with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    pub value: String,
    pub updated_at: Timestamp,
}

impl super::Database {
    /// Reads the value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<StoredValue>> {
        let row = self
            .connection
            .query_row(SELECT_VALUE_SQL, params![key], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .optional()
            .storage_context("Failed to read stored value")?;

        row.map(|(value, updated_at)| {
            let updated_at = updated_at.parse::<Timestamp>().map_err(|e| {
                PlannerError::invalid_input("updated_at")
                    .with_reason(format!("invalid timestamp '{updated_at}': {e}"))
            })?;
            Ok(StoredValue { value, updated_at })
        })
        .transpose()
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub fn put_value(&mut self, key: &str, value: &str) -> Result<Timestamp> {
        let now = Timestamp::now();
        self.connection
            .execute(UPSERT_VALUE_SQL, params![key, value, now.to_string()])
            .storage_context("Failed to write stored value")?;
        Ok(now)
    }

    /// Removes `key`. Returns whether a value was present.
    pub fn delete_value(&mut self, key: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_VALUE_SQL, params![key])
            .storage_context("Failed to delete stored value")?;
        Ok(removed > 0)
    }
}
