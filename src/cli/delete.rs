use anyhow::{anyhow, Result};

use crate::cli::display::list_line;
use crate::cli::ui::{confirm, find_dossier};
use crate::store::DossierStore;

/// Execute the delete command
pub fn run_delete(store: &dyn DossierStore, identifier: &str, force: bool) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    let Some(dossier) = find_dossier(store, identifier)? else {
        println!("No dossier found.");
        return Ok(());
    };

    println!("{}", list_line(&dossier));
    println!();

    if !force && !confirm(&format!("Delete {}?", dossier.full_name)) {
        return Ok(());
    }

    if store.remove(&dossier.id)? {
        log::info!("deleted dossier {}", dossier.id);
        println!("Deleted.");
    } else {
        println!("No dossier found.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Dossier, Fact};

    #[test]
    fn test_force_delete_removes_dossier_and_facts() {
        let db = Database::open_memory().unwrap();
        let d = Dossier::new("Ann");
        db.upsert_dossier(&d).unwrap();
        db.insert_fact(&Fact::new(d.id.clone())).unwrap();

        run_delete(&db, &d.id, true).unwrap();

        assert!(db.get_dossier(&d.id).unwrap().is_none());
        assert!(db.get_facts_for_dossier(&d.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_an_error() {
        let db = Database::open_memory().unwrap();
        assert!(run_delete(&db, "nobody", true).is_ok());
    }

    #[test]
    fn test_empty_identifier_error() {
        let db = Database::open_memory().unwrap();
        assert!(run_delete(&db, "  ", true).is_err());
    }
}
