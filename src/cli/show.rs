use anyhow::{anyhow, Result};

use crate::cli::display::print_dossier;
use crate::cli::ui::find_dossier;
use crate::db::Database;
use crate::models::{Dossier, DossierDetail};
use crate::store::DossierStore;

/// Execute the show command
pub fn run_show(store: &dyn DossierStore, db: Option<&Database>, identifier: &str) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    let Some(dossier) = find_dossier(store, identifier)? else {
        println!("No dossier found.");
        return Ok(());
    };

    print_dossier(&load_detail(db, dossier)?);
    Ok(())
}

/// Attach facts and stories when the database is available
fn load_detail(db: Option<&Database>, dossier: Dossier) -> Result<DossierDetail> {
    let Some(db) = db else {
        return Ok(DossierDetail::without_children(dossier));
    };
    Ok(db
        .get_dossier_detail(&dossier.id)?
        .unwrap_or_else(|| DossierDetail::without_children(dossier)))
}
