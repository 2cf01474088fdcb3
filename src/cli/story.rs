use anyhow::{anyhow, Result};

use crate::cli::display::truncate;
use crate::cli::fact::{entry_body, entry_date, lookup, parse_entry_id};
use crate::cli::{EntryAddArgs, StoryCommand};
use crate::db::Database;
use crate::models::{Dossier, Story};
use crate::store::DossierStore;

/// Execute a story subcommand
pub fn run_story(store: &dyn DossierStore, db: &Database, cmd: StoryCommand) -> Result<()> {
    match cmd {
        StoryCommand::Add(args) => {
            let Some(dossier) = lookup(store, &args.identifier)? else {
                return Ok(());
            };
            db.insert_story(&build_story(&dossier, args)?)?;
            println!("Saved.");
        }
        StoryCommand::List(args) => {
            let Some(dossier) = lookup(store, &args.identifier)? else {
                return Ok(());
            };
            let stories = db.get_stories_for_dossier(&dossier.id)?;
            if stories.is_empty() {
                println!("No stories for {}.", dossier.full_name);
            }
            for s in &stories {
                println!(
                    "{}  {}  [{}]",
                    s.date.as_deref().unwrap_or("----------"),
                    s.title.as_deref().unwrap_or("(untitled)"),
                    s.id
                );
                if let Some(ref content) = s.content {
                    println!("    {}", truncate(content, 70));
                }
            }
        }
        StoryCommand::Rm(args) => {
            if db.delete_story(parse_entry_id(&args.id)?)? {
                println!("Deleted.");
            } else {
                println!("No story found with ID: {}", args.id);
            }
        }
    }
    Ok(())
}

fn build_story(dossier: &Dossier, args: EntryAddArgs) -> Result<Story> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(anyhow!("Title cannot be empty."));
    }
    let mut story = Story::new(dossier.id.clone());
    story.date = Some(entry_date(args.date.as_deref())?);
    story.title = Some(title.to_string());
    story.content = entry_body(args.body, "story:")?;
    Ok(story)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EntryRemoveArgs;

    #[test]
    fn test_add_and_remove_story() {
        let db = Database::open_memory().unwrap();
        let d = Dossier::new("Ann Lee");
        db.upsert_dossier(&d).unwrap();

        let args = EntryAddArgs {
            identifier: "lee".to_string(),
            title: "  The canoe trip ".to_string(),
            date: None,
            body: Some("We capsized twice.".to_string()),
        };
        run_story(&db, &db, StoryCommand::Add(args)).unwrap();

        let stories = db.get_stories_for_dossier(&d.id).unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].title.as_deref(), Some("The canoe trip"));
        assert!(stories[0].date.is_some());

        let rm = EntryRemoveArgs {
            id: stories[0].id.to_string(),
        };
        run_story(&db, &db, StoryCommand::Rm(rm)).unwrap();
        assert!(db.get_stories_for_dossier(&d.id).unwrap().is_empty());
    }

    #[test]
    fn test_blank_title_rejected() {
        let d = Dossier::new("Ann");
        let args = EntryAddArgs {
            identifier: d.id.clone(),
            title: " ".to_string(),
            date: None,
            body: Some(String::new()),
        };
        assert!(build_story(&d, args).is_err());
    }
}
