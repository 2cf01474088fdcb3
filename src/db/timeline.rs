//! Facts and stories: dated child records of a dossier.

use anyhow::Result;
use rusqlite::{params, Row};
use uuid::Uuid;

use super::dossiers::{format_stored_time, parse_stored_time};
use super::Database;
use crate::models::{DossierDetail, Fact, Story};

/// Helper to convert UUID parse errors to rusqlite errors
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl Database {
    // ==================== FACTS ====================

    pub fn insert_fact(&self, fact: &Fact) -> Result<()> {
        self.conn.execute(
            "INSERT INTO facts (id, dossier_id, date, title, note, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                fact.id.to_string(),
                fact.dossier_id,
                fact.date,
                fact.title,
                fact.note,
                format_stored_time(&fact.created_at),
            ],
        )?;
        Ok(())
    }

    /// Newest date first, undated last.
    pub fn get_facts_for_dossier(&self, dossier_id: &str) -> Result<Vec<Fact>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT * FROM facts WHERE dossier_id = ?
               ORDER BY date IS NULL, date DESC, created_at DESC"#,
        )?;

        let facts = stmt
            .query_map([dossier_id], Self::row_to_fact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(facts)
    }

    pub fn delete_fact(&self, id: Uuid) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM facts WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ==================== STORIES ====================

    pub fn insert_story(&self, story: &Story) -> Result<()> {
        self.conn.execute(
            "INSERT INTO stories (id, dossier_id, date, title, content, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                story.id.to_string(),
                story.dossier_id,
                story.date,
                story.title,
                story.content,
                format_stored_time(&story.created_at),
            ],
        )?;
        Ok(())
    }

    /// Newest date first, undated last.
    pub fn get_stories_for_dossier(&self, dossier_id: &str) -> Result<Vec<Story>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT * FROM stories WHERE dossier_id = ?
               ORDER BY date IS NULL, date DESC, created_at DESC"#,
        )?;

        let stories = stmt
            .query_map([dossier_id], Self::row_to_story)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(stories)
    }

    pub fn delete_story(&self, id: Uuid) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM stories WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ==================== DETAIL ====================

    pub fn get_dossier_detail(&self, id: &str) -> Result<Option<DossierDetail>> {
        let Some(dossier) = self.get_dossier(id)? else {
            return Ok(None);
        };
        Ok(Some(DossierDetail {
            facts: self.get_facts_for_dossier(&dossier.id)?,
            stories: self.get_stories_for_dossier(&dossier.id)?,
            dossier,
        }))
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_fact(row: &Row) -> rusqlite::Result<Fact> {
        let id: String = row.get("id")?;
        let created_at: String = row.get("created_at")?;

        Ok(Fact {
            id: parse_uuid(&id)?,
            dossier_id: row.get("dossier_id")?,
            date: row.get("date")?,
            title: row.get("title")?,
            note: row.get("note")?,
            created_at: parse_stored_time(&created_at),
        })
    }

    fn row_to_story(row: &Row) -> rusqlite::Result<Story> {
        let id: String = row.get("id")?;
        let created_at: String = row.get("created_at")?;

        Ok(Story {
            id: parse_uuid(&id)?,
            dossier_id: row.get("dossier_id")?,
            date: row.get("date")?,
            title: row.get("title")?,
            content: row.get("content")?,
            created_at: parse_stored_time(&created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dossier;

    fn db_with_dossier() -> (Database, Dossier) {
        let db = Database::open_memory().unwrap();
        let d = Dossier::new("Ann");
        db.upsert_dossier(&d).unwrap();
        (db, d)
    }

    fn fact(dossier: &Dossier, date: Option<&str>, title: &str) -> Fact {
        let mut f = Fact::new(dossier.id.clone());
        f.date = date.map(str::to_string);
        f.title = Some(title.to_string());
        f
    }

    #[test]
    fn test_fact_crud_and_ordering() {
        let (db, d) = db_with_dossier();
        db.insert_fact(&fact(&d, Some("2023-01-01"), "old")).unwrap();
        db.insert_fact(&fact(&d, None, "undated")).unwrap();
        let newest = fact(&d, Some("2024-06-01"), "new");
        db.insert_fact(&newest).unwrap();

        let titles: Vec<String> = db
            .get_facts_for_dossier(&d.id)
            .unwrap()
            .into_iter()
            .filter_map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["new", "old", "undated"]);

        assert!(db.delete_fact(newest.id).unwrap());
        assert!(!db.delete_fact(newest.id).unwrap());
        assert_eq!(db.get_facts_for_dossier(&d.id).unwrap().len(), 2);
    }

    #[test]
    fn test_story_crud() {
        let (db, d) = db_with_dossier();
        let mut s = Story::new(d.id.clone());
        s.title = Some("Camping trip".to_string());
        s.content = Some("It rained the whole time.".to_string());
        db.insert_story(&s).unwrap();

        let stories = db.get_stories_for_dossier(&d.id).unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0], Story { created_at: stories[0].created_at, ..s.clone() });

        assert!(db.delete_story(s.id).unwrap());
        assert!(db.get_stories_for_dossier(&d.id).unwrap().is_empty());
    }

    #[test]
    fn test_fact_requires_existing_dossier() {
        let db = Database::open_memory().unwrap();
        let orphan = Fact::new("missing".to_string());
        assert!(db.insert_fact(&orphan).is_err());
    }

    #[test]
    fn test_delete_dossier_cascades() {
        let (db, d) = db_with_dossier();
        db.insert_fact(&fact(&d, None, "x")).unwrap();
        db.insert_story(&Story::new(d.id.clone())).unwrap();

        assert!(db.delete_dossier(&d.id).unwrap());
        assert!(db.get_facts_for_dossier(&d.id).unwrap().is_empty());
        assert!(db.get_stories_for_dossier(&d.id).unwrap().is_empty());
    }

    #[test]
    fn test_dossier_detail() {
        let (db, d) = db_with_dossier();
        db.insert_fact(&fact(&d, Some("2024-01-01"), "x")).unwrap();

        let detail = db.get_dossier_detail(&d.id).unwrap().unwrap();
        assert_eq!(detail.dossier.id, d.id);
        assert_eq!(detail.facts.len(), 1);
        assert!(detail.stories.is_empty());
        assert!(db.get_dossier_detail("nope").unwrap().is_none());
    }
}
