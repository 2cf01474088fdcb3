use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::DossierStore;
use crate::models::Dossier;

pub const JSON_FILE_NAME: &str = "dossiers.json";

/// Whole collection kept in a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open `dossiers.json` inside `dir`, creating it as `[]` on first run.
    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open_at(dir.join(JSON_FILE_NAME))
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        if !path.exists() {
            fs::write(&path, "[]").with_context(|| format!("Failed to create {}", path.display()))?;
            log::info!("created empty store at {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DossierStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Dossier>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).with_context(|| format!("Corrupt store file {}", self.path.display()))
    }

    fn save(&self, dossiers: &[Dossier]) -> Result<()> {
        let json = serde_json::to_string(dossiers)?;
        // Write next to the target then rename, so a failed write leaves the old file intact
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        log::debug!("saved {} dossier(s) to {}", dossiers.len(), self.path.display());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "json"
    }
}
