mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::models::BudgetState;
use crate::session::Identity;

/// Document store: one serialized [`BudgetState`] per identity, written
/// atomically with a monotonic version. Single writer per profile is
/// assumed; there is no merge for concurrent writers.
pub(crate) struct Store {
    conn: Connection,
}

impl Store {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set store pragmas")?;
        let mut store = Self { conn };
        store.migrate().context("Store migration failed")?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh store - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Load the budget document for an identity, if one exists.
    pub(crate) fn load_state(&self, identity: &Identity) -> Result<Option<BudgetState>> {
        let result = self.conn.query_row(
            "SELECT doc FROM budget_docs WHERE identity = ?1",
            params![identity.as_str()],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(doc) => {
                let state = serde_json::from_str(&doc)
                    .with_context(|| format!("Corrupt budget document for '{identity}'"))?;
                Ok(Some(state))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the whole document in one write, bumping its version.
    /// Returns the new version.
    pub(crate) fn save_state(&self, identity: &Identity, state: &BudgetState) -> Result<i64> {
        let doc =
            serde_json::to_string(state).context("Failed to serialize budget document")?;
        let updated_at = chrono::Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO budget_docs (identity, doc, version, updated_at)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(identity) DO UPDATE SET doc = ?2, version = version + 1, updated_at = ?3",
            params![identity.as_str(), doc, updated_at],
        )?;
        self.state_version(identity)?
            .ok_or_else(|| anyhow::anyhow!("Budget document missing after save"))
    }

    pub(crate) fn state_version(&self, identity: &Identity) -> Result<Option<i64>> {
        let result = self.conn.query_row(
            "SELECT version FROM budget_docs WHERE identity = ?1",
            params![identity.as_str()],
            |row| row.get(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the document for an identity; a missing document is a no-op.
    pub(crate) fn delete_state(&self, identity: &Identity) -> Result<()> {
        self.conn.execute(
            "DELETE FROM budget_docs WHERE identity = ?1",
            params![identity.as_str()],
        )?;
        Ok(())
    }
}
