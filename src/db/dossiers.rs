use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;

use super::Database;
use crate::models::Dossier;
use crate::store::DossierStore;

const UPSERT_DOSSIER: &str = r#"INSERT INTO dossiers (
        id, full_name, dob, parents, history, traumas, habits,
        communication_style, friendliness_level, relation, last_contact_date,
        photo, tags, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        full_name = excluded.full_name,
        dob = excluded.dob,
        parents = excluded.parents,
        history = excluded.history,
        traumas = excluded.traumas,
        habits = excluded.habits,
        communication_style = excluded.communication_style,
        friendliness_level = excluded.friendliness_level,
        relation = excluded.relation,
        last_contact_date = excluded.last_contact_date,
        photo = excluded.photo,
        tags = excluded.tags,
        created_at = excluded.created_at,
        updated_at = excluded.updated_at"#;

/// Fixed-width RFC 3339 so text ordering matches time ordering
pub(super) fn format_stored_time(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored RFC 3339 timestamp, falling back to now for damaged rows
pub(super) fn parse_stored_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl Database {
    // ==================== DOSSIER WRITE ====================

    /// Insert a dossier, or overwrite the row with the same id.
    ///
    /// Uses `ON CONFLICT DO UPDATE` rather than `INSERT OR REPLACE`: a
    /// replace deletes the old row first, which would cascade to its facts
    /// and stories.
    pub fn upsert_dossier(&self, dossier: &Dossier) -> Result<()> {
        write_dossier(&self.conn, dossier)
    }

    /// Replace the whole collection in one transaction. Rows whose id is not
    /// in `dossiers` are deleted along with their facts and stories.
    pub fn replace_all_dossiers(&self, dossiers: &[Dossier]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let keep: HashSet<&str> = dossiers.iter().map(|d| d.id.as_str()).collect();
        let existing: Vec<String> = tx
            .prepare("SELECT id FROM dossiers")?
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut removed = 0;
        for id in existing.iter().filter(|id| !keep.contains(id.as_str())) {
            removed += tx.execute("DELETE FROM dossiers WHERE id = ?", [id])?;
        }
        for dossier in dossiers {
            write_dossier(&tx, dossier)?;
        }

        tx.commit()?;
        log::debug!("stored {} dossier(s), removed {}", dossiers.len(), removed);
        Ok(())
    }

    // ==================== DOSSIER READ ====================

    pub fn get_dossier(&self, id: &str) -> Result<Option<Dossier>> {
        let mut stmt = self.conn.prepare("SELECT * FROM dossiers WHERE id = ?")?;

        let result = stmt.query_row([id], Self::row_to_dossier);

        match result {
            Ok(dossier) => Ok(Some(dossier)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All dossiers, most recently updated first.
    pub fn list_dossiers(&self) -> Result<Vec<Dossier>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM dossiers ORDER BY updated_at DESC, full_name ASC")?;

        let dossiers = stmt
            .query_map([], Self::row_to_dossier)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(dossiers)
    }

    pub fn count_dossiers(&self) -> Result<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dossiers", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Case-insensitive search on the name.
    pub fn search_dossiers_by_name(&self, query: &str) -> Result<Vec<Dossier>> {
        let pattern = format!("%{}%", Self::escape_like(&query.to_lowercase()));
        let mut stmt = self.conn.prepare(
            r#"SELECT * FROM dossiers
               WHERE LOWER(full_name) LIKE ? ESCAPE '\'
               ORDER BY full_name ASC"#,
        )?;

        let dossiers = stmt
            .query_map([pattern], Self::row_to_dossier)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(dossiers)
    }

    // ==================== DOSSIER DELETE ====================

    /// Hard delete a dossier and its facts and stories (via CASCADE).
    pub fn delete_dossier(&self, id: &str) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM dossiers WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ==================== HELPERS ====================

    /// Escape LIKE wildcards so user input matches literally
    fn escape_like(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    }

    fn row_to_dossier(row: &Row) -> rusqlite::Result<Dossier> {
        let tags: String = row.get("tags")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Dossier {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            dob: row.get("dob")?,
            parents: row.get("parents")?,
            history: row.get("history")?,
            traumas: row.get("traumas")?,
            habits: row.get("habits")?,
            communication_style: row.get("communication_style")?,
            friendliness_level: row.get("friendliness_level")?,
            relation: row.get("relation")?,
            last_contact_date: row.get("last_contact_date")?,
            photo: row.get("photo")?,
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            created_at: parse_stored_time(&created_at),
            updated_at: parse_stored_time(&updated_at),
        })
    }
}

fn write_dossier(conn: &Connection, dossier: &Dossier) -> Result<()> {
    let tags = serde_json::to_string(&dossier.tags)?;
    conn.execute(
        UPSERT_DOSSIER,
        params![
            dossier.id,
            dossier.full_name,
            dossier.dob,
            dossier.parents,
            dossier.history,
            dossier.traumas,
            dossier.habits,
            dossier.communication_style,
            dossier.friendliness_level,
            dossier.relation,
            dossier.last_contact_date,
            dossier.photo,
            tags,
            format_stored_time(&dossier.created_at),
            format_stored_time(&dossier.updated_at),
        ],
    )?;
    Ok(())
}

impl DossierStore for Database {
    fn load(&self) -> Result<Vec<Dossier>> {
        self.list_dossiers()
    }

    fn save(&self, dossiers: &[Dossier]) -> Result<()> {
        self.replace_all_dossiers(dossiers)
    }

    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, id: &str) -> Result<Option<Dossier>> {
        self.get_dossier(id)
    }

    fn upsert(&self, dossier: &Dossier) -> Result<()> {
        self.upsert_dossier(dossier)
    }

    fn remove(&self, id: &str) -> Result<bool> {
        self.delete_dossier(id)
    }

    fn find_by_name(&self, query: &str) -> Result<Vec<Dossier>> {
        self.search_dossiers_by_name(query)
    }
}
