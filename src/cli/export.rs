use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::store::DossierStore;
use crate::transfer::{encode, Format};

/// Execute the export command. Without a path the document goes to stdout.
pub fn run_export(
    store: &dyn DossierStore,
    path: Option<&Path>,
    format: Option<Format>,
    bom: bool,
) -> Result<()> {
    let dossiers = store.load()?;
    let format = format.unwrap_or_else(|| path.map(Format::from_path).unwrap_or(Format::Csv));
    let document = encode(&dossiers, format, bom)?;

    match path {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "exported {} dossier(s) as {} to {}",
                dossiers.len(),
                format.as_str(),
                path.display()
            );
            eprintln!("Exported {} dossiers to {}", dossiers.len(), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(document.as_bytes())?;
            writeln!(out)?;
        }
    }
    Ok(())
}
