//! SQLite-backed store for the active catalog snapshot

use rusqlite::Connection;
use std::path::PathBuf;
use tracing::info;

use super::{CatalogReader, FunctionalityRecord};
use crate::error::ReconResult;

pub struct CatalogStore {
    db_path: PathBuf,
}

impl CatalogStore {
    pub fn new(db_path: PathBuf) -> ReconResult<Self> {
        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> ReconResult<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS catalog (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                functionality_id TEXT,
                functionality TEXT,
                module_id TEXT,
                module TEXT
            )",
            [],
        )?;
        Ok(())
    }

    /// Replace the active snapshot with `records` in one transaction
    pub fn activate(&self, records: &[FunctionalityRecord]) -> ReconResult<()> {
        let mut conn = Connection::open(&self.db_path)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM catalog", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO catalog (functionality_id, functionality, module_id, module)
                 VALUES (?, ?, ?, ?)",
            )?;
            for record in records {
                stmt.execute((
                    &record.id,
                    &record.name,
                    &record.module_id,
                    &record.module,
                ))?;
            }
        }
        tx.commit()?;
        info!("📚 Activated catalog with {} functionalities", records.len());
        Ok(())
    }

    pub fn has_active_catalog(&self) -> ReconResult<bool> {
        let conn = Connection::open(&self.db_path)?;
        let count: i64 = conn.query_row("SELECT COUNT(1) FROM catalog", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Distinct module names in the active snapshot, sorted
    pub fn modules(&self) -> ReconResult<Vec<String>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT module FROM catalog WHERE module IS NOT NULL AND module != '' ORDER BY module",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut modules = Vec::new();
        for row in rows {
            modules.push(row?);
        }
        Ok(modules)
    }
}

impl CatalogReader for CatalogStore {
    fn records(&self) -> ReconResult<Vec<FunctionalityRecord>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(
            "SELECT functionality_id, functionality, module_id, module
             FROM catalog
             ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FunctionalityRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                module_id: row.get(2)?,
                module: row.get(3)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
