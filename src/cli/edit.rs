use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::cli::add::fill_profile;
use crate::cli::ui::find_dossier;
use crate::cli::ProfileArgs;
use crate::models::Dossier;
use crate::store::DossierStore;

/// Execute the edit command
pub fn run_edit(
    store: &dyn DossierStore,
    identifier: &str,
    name: Option<String>,
    profile: &ProfileArgs,
) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    let Some(base) = find_dossier(store, identifier)? else {
        println!("No dossier found.");
        return Ok(());
    };

    let edited = apply_edit(&base, name.as_deref(), profile, Utc::now());
    if !changed(&base, &edited) {
        println!("No changes.");
        return Ok(());
    }

    store.upsert(&edited)?;
    log::info!("edited dossier {}", edited.id);
    println!("Updated: {}", edited.full_name);
    Ok(())
}

/// Overlay the given flags onto `base`. Absent or blank flags keep the stored value.
fn apply_edit(base: &Dossier, name: Option<&str>, profile: &ProfileArgs, now: DateTime<Utc>) -> Dossier {
    let mut patch = Dossier::with_id(base.id.clone(), base.full_name.clone(), now);
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        patch.full_name = name.to_string();
    }
    fill_profile(&mut patch, profile);
    patch.created_at = base.created_at;

    let mut edited = base.clone();
    edited.overlay(&patch, now);
    edited
}

fn changed(before: &Dossier, after: &Dossier) -> bool {
    let mut a = after.clone();
    a.updated_at = before.updated_at;
    a != *before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::Duration;

    fn stored(db: &Database) -> Dossier {
        let mut d = Dossier::new("Ann Lee");
        d.relation = Some("cousin".to_string());
        d.friendliness_level = Some(2);
        d.tags = vec!["family".to_string()];
        db.upsert_dossier(&d).unwrap();
        d
    }

    #[test]
    fn test_apply_edit_overlays_only_given_fields() {
        let db = Database::open_memory().unwrap();
        let base = stored(&db);
        let later = base.updated_at + Duration::minutes(1);
        let profile = ProfileArgs {
            friendliness: Some(4),
            habits: Some("reads".to_string()),
            ..Default::default()
        };

        let edited = apply_edit(&base, None, &profile, later);
        assert_eq!(edited.full_name, "Ann Lee");
        assert_eq!(edited.relation.as_deref(), Some("cousin"));
        assert_eq!(edited.friendliness_level, Some(4));
        assert_eq!(edited.habits.as_deref(), Some("reads"));
        assert_eq!(edited.tags, vec!["family"]);
        assert_eq!(edited.created_at, base.created_at);
        assert_eq!(edited.updated_at, later);
    }

    #[test]
    fn test_apply_edit_renames_and_replaces_tags() {
        let db = Database::open_memory().unwrap();
        let base = stored(&db);
        let profile = ProfileArgs {
            tags: Some("work,chess".to_string()),
            ..Default::default()
        };
        let edited = apply_edit(&base, Some(" Ann Stone "), &profile, Utc::now());
        assert_eq!(edited.full_name, "Ann Stone");
        assert_eq!(edited.tags, vec!["work", "chess"]);
    }

    #[test]
    fn test_edit_without_flags_changes_nothing() {
        let db = Database::open_memory().unwrap();
        let base = stored(&db);
        let edited = apply_edit(&base, None, &ProfileArgs::default(), Utc::now());
        assert!(!changed(&base, &edited));
    }

    #[test]
    fn test_run_edit_saves() {
        let db = Database::open_memory().unwrap();
        let base = stored(&db);
        let profile = ProfileArgs {
            relation: Some("friend".to_string()),
            ..Default::default()
        };
        run_edit(&db, &base.id, None, &profile).unwrap();
        let loaded = db.get_dossier(&base.id).unwrap().unwrap();
        assert_eq!(loaded.relation.as_deref(), Some("friend"));
    }
}
