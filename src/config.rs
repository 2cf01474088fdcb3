//! Runtime configuration
//!
//! Resolved once at startup from command-line flags, then environment
//! variables, then built-in defaults.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

const ENV_HOME: &str = "DOSSIER_HOME";
const ENV_STORE: &str = "DOSSIER_STORE";
const APP_DIR: &str = "dossier";

/// Which persistence backend holds the dossiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreKind {
    /// SQLite database with facts and stories
    #[default]
    Sqlite,
    /// Single JSON file, dossiers only
    Json,
}

impl StoreKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Some(Self::Sqlite),
            "json" | "file" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub store: StoreKind,
}

impl Config {
    /// Flags win over `DOSSIER_HOME` / `DOSSIER_STORE`, which win over defaults.
    pub fn resolve(data_dir: Option<PathBuf>, store: Option<StoreKind>) -> Result<Self> {
        Self::resolve_with(data_dir, store, |key| env::var(key).ok())
    }

    fn resolve_with<F>(data_dir: Option<PathBuf>, store: Option<StoreKind>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => match lookup(ENV_HOME).filter(|v| !v.trim().is_empty()) {
                Some(dir) => PathBuf::from(dir),
                None => Self::default_data_dir()?,
            },
        };

        let store = match store {
            Some(kind) => kind,
            None => match lookup(ENV_STORE) {
                Some(raw) => StoreKind::parse(&raw)
                    .ok_or_else(|| anyhow!("{} must be 'sqlite' or 'json', got '{}'", ENV_STORE, raw))?,
                None => StoreKind::default(),
            },
        };

        Ok(Self { data_dir, store })
    }

    fn default_data_dir() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_DIR))
    }
}
