use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

mod dossiers;
mod schema;
mod timeline;

pub use schema::SCHEMA_VERSION;

pub const DB_FILE_NAME: &str = "dossiers.db";

pub struct Database {
    conn: Connection,
}

/// Schema steps in order; entry `n` brings the database to version `n + 1`.
const MIGRATIONS: [&str; SCHEMA_VERSION as usize] = [schema::SCHEMA_V1, schema::MIGRATION_V2];

impl Database {
    /// Open `dossiers.db` inside `dir`, creating it if needed, running migrations
    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open_at(dir.join(DB_FILE_NAME))
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        log::info!("opened database at {}", path.display());
        Self::init(conn)
    }

    /// Throwaway database for tests
    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Apply every step past the stored version, one transaction per step.
    fn migrate(&self) -> Result<()> {
        let current = self.get_schema_version()?;

        for (step, sql) in MIGRATIONS.iter().enumerate() {
            let target = step as i32 + 1;
            if target <= current {
                continue;
            }
            let tx = self.conn.unchecked_transaction()?;
            tx.execute_batch(sql)
                .with_context(|| format!("Migration to schema v{} failed", target))?;
            tx.execute(
                "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
                [target],
            )?;
            tx.commit()?;
            log::debug!("database schema now at v{}", target);
        }

        Ok(())
    }

    /// 0 for a fresh file without the version table
    fn get_schema_version(&self) -> Result<i32> {
        let has_table: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(0);
        }

        let version = self
            .conn
            .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(version.unwrap_or(0))
    }
}
