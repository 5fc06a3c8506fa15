//! Relational schema migrations.
//!
//! The DDL is embedded at compile time and executed when a [`SqlAdapter`] is
//! opened. Every statement uses `IF NOT EXISTS`, so re-running is a no-op.

use crate::adapter::SqlAdapter;
use crate::error::StorageError;

/// Initial schema: `plants`, `species_cache`, `kv_store`.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl SqlAdapter {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), StorageError> {
        self.conn()
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StorageError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
