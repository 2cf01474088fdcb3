use anyhow::{anyhow, Result};

use crate::cli::ui::{confirm, select_label};
use crate::cli::ProfileArgs;
use crate::models::{clamp_friendliness, split_tags, Dossier};
use crate::store::DossierStore;

/// Friendliness given to new dossiers when the flag is omitted
pub const DEFAULT_FRIENDLINESS: u8 = 3;

/// Copy the profile flags onto `dossier`. Blank values are treated as absent.
pub(crate) fn fill_profile(dossier: &mut Dossier, profile: &ProfileArgs) {
    let text = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    dossier.dob = text(&profile.dob);
    dossier.parents = text(&profile.parents);
    dossier.history = text(&profile.history);
    dossier.traumas = text(&profile.traumas);
    dossier.habits = text(&profile.habits);
    dossier.communication_style = text(&profile.communication);
    dossier.relation = text(&profile.relation);
    dossier.last_contact_date = text(&profile.last_contact);
    dossier.friendliness_level = profile.friendliness.map(clamp_friendliness);
    if let Some(ref tags) = profile.tags {
        dossier.tags = split_tags(tags, ",");
    }
}

/// Execute the add command
pub fn run_add(store: &dyn DossierStore, name: &str, profile: &ProfileArgs) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Name cannot be empty."));
    }

    let dossier = build_dossier(name, profile);

    let duplicates: Vec<Dossier> = store
        .find_by_name(name)?
        .into_iter()
        .filter(|d| d.full_name.eq_ignore_ascii_case(name))
        .collect();
    if let Some(existing) = duplicates.first() {
        println!("Warning: Similar dossier exists:");
        println!("  {}", select_label(existing));
        println!();
        if !confirm("Continue anyway?") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.upsert(&dossier)?;
    log::info!("added dossier {}", dossier.id);
    println!("Created: {}", dossier.full_name);
    Ok(())
}

fn build_dossier(name: &str, profile: &ProfileArgs) -> Dossier {
    let mut dossier = Dossier::new(name);
    fill_profile(&mut dossier, profile);
    if dossier.friendliness_level.is_none() {
        dossier.friendliness_level = Some(DEFAULT_FRIENDLINESS);
    }
    dossier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_build_dossier_defaults() {
        let d = build_dossier("Ann", &ProfileArgs::default());
        assert_eq!(d.full_name, "Ann");
        assert_eq!(d.friendliness_level, Some(DEFAULT_FRIENDLINESS));
        assert!(d.tags.is_empty());
        assert!(d.relation.is_none());
    }

    #[test]
    fn test_build_dossier_from_flags() {
        let profile = ProfileArgs {
            friendliness: Some(9),
            relation: Some("  ".to_string()),
            habits: Some("runs at dawn".to_string()),
            tags: Some("work, chess,,".to_string()),
            ..Default::default()
        };
        let d = build_dossier("Ann", &profile);
        assert_eq!(d.friendliness_level, Some(5));
        assert!(d.relation.is_none());
        assert_eq!(d.habits.as_deref(), Some("runs at dawn"));
        assert_eq!(d.tags, vec!["work", "chess"]);
    }

    #[test]
    fn test_add_stores_dossier() {
        let db = Database::open_memory().unwrap();
        run_add(&db, "  Ann Lee ", &ProfileArgs::default()).unwrap();
        let all = db.list_dossiers().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].full_name, "Ann Lee");
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let db = Database::open_memory().unwrap();
        assert!(run_add(&db, "   ", &ProfileArgs::default()).is_err());
    }
}
