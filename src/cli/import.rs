use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use crate::store::DossierStore;
use crate::transfer::{apply_import, decode, Format, ImportMode, MergeSummary};

/// Import results summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub incoming: usize,
    pub summary: MergeSummary,
    pub total_after: usize,
}

/// Execute the import command.
pub fn run_import(
    store: &dyn DossierStore,
    path: &Path,
    format: Option<Format>,
    mode: ImportMode,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        eprintln!("Dry run: {}", path.display());
    } else {
        eprintln!("Importing: {}", path.display());
    }

    let stats = import_file(store, path, format, mode, dry_run)?;
    print_summary(&stats, mode, dry_run);
    Ok(())
}

/// Read, decode and combine `path` with the store. Nothing is saved on a dry run.
pub fn import_file(
    store: &dyn DossierStore,
    path: &Path,
    format: Option<Format>,
    mode: ImportMode,
    dry_run: bool,
) -> Result<ImportStats> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let format = format.unwrap_or_else(|| Format::from_path(path));
    let now = Utc::now();

    let incoming = decode(&text, format, now)
        .with_context(|| format!("Could not import {} as {}", path.display(), format.as_str()))?;
    let incoming_len = incoming.len();

    let current = store.load()?;
    let (combined, summary) = apply_import(current, incoming, mode, now);
    log::debug!(
        "import of {}: {} updated, {} inserted, {} retained",
        path.display(),
        summary.updated,
        summary.inserted,
        summary.retained
    );

    if !dry_run {
        store.save(&combined)?;
        log::info!(
            "imported {} record(s) from {} into {} store",
            incoming_len,
            path.display(),
            store.kind()
        );
    }

    Ok(ImportStats {
        incoming: incoming_len,
        summary,
        total_after: combined.len(),
    })
}

fn print_summary(stats: &ImportStats, mode: ImportMode, dry_run: bool) {
    println!("Read {} records", stats.incoming);

    match mode {
        ImportMode::Merge => {
            let (update, insert) = if dry_run {
                ("Would update", "would insert")
            } else {
                ("Updated", "inserted")
            };
            println!("{} {}, {} {}", update, stats.summary.updated, insert, stats.summary.inserted);
            if stats.summary.retained > 0 {
                println!("Kept {} existing", stats.summary.retained);
            }
        }
        ImportMode::Replace => {
            let verb = if dry_run { "Would replace" } else { "Replaced" };
            println!("{} collection with {} records", verb, stats.total_after);
        }
    }
}
