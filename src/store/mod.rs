//! Persistence behind a save/load interface.
//!
//! The import/export core only ever sees `Vec<Dossier>`; where those
//! records live is decided here. `Database` (SQLite) and `JsonFileStore`
//! both implement [`DossierStore`].

mod json_file;

use anyhow::Result;

use crate::models::Dossier;

pub use json_file::JsonFileStore;

pub trait DossierStore {
    /// All dossiers, in the store's natural order.
    fn load(&self) -> Result<Vec<Dossier>>;

    /// Replace the stored collection with `dossiers`.
    fn save(&self, dossiers: &[Dossier]) -> Result<()>;

    /// Short name for messages ("sqlite", "json").
    fn kind(&self) -> &'static str;

    fn get(&self, id: &str) -> Result<Option<Dossier>> {
        Ok(self.load()?.into_iter().find(|d| d.id == id))
    }

    /// Insert or replace the dossier with the same id.
    fn upsert(&self, dossier: &Dossier) -> Result<()> {
        let mut all = self.load()?;
        match all.iter_mut().find(|d| d.id == dossier.id) {
            Some(existing) => *existing = dossier.clone(),
            None => all.push(dossier.clone()),
        }
        self.save(&all)
    }

    /// Returns false when no dossier had that id.
    fn remove(&self, id: &str) -> Result<bool> {
        let mut all = self.load()?;
        let before = all.len();
        all.retain(|d| d.id != id);
        if all.len() == before {
            return Ok(false);
        }
        self.save(&all)?;
        Ok(true)
    }

    /// Case-insensitive substring match on the name.
    fn find_by_name(&self, query: &str) -> Result<Vec<Dossier>> {
        let needle = query.to_lowercase();
        Ok(self
            .load()?
            .into_iter()
            .filter(|d| d.full_name.to_lowercase().contains(&needle))
            .collect())
    }
}
