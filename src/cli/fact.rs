//! Fact commands for recording dated facts about a person

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use inquire::Text;
use uuid::Uuid;

use crate::cli::display::truncate;
use crate::cli::ui::{find_dossier, minimal_render_config};
use crate::cli::{EntryAddArgs, FactCommand};
use crate::db::Database;
use crate::models::{Dossier, Fact};
use crate::store::DossierStore;

/// Execute a fact subcommand
pub fn run_fact(store: &dyn DossierStore, db: &Database, cmd: FactCommand) -> Result<()> {
    match cmd {
        FactCommand::Add(args) => {
            let Some(dossier) = lookup(store, &args.identifier)? else {
                return Ok(());
            };
            let fact = build_fact(&dossier, args)?;
            db.insert_fact(&fact)?;
            println!("Saved.");
        }
        FactCommand::List(args) => {
            let Some(dossier) = lookup(store, &args.identifier)? else {
                return Ok(());
            };
            let facts = db.get_facts_for_dossier(&dossier.id)?;
            if facts.is_empty() {
                println!("No facts for {}.", dossier.full_name);
            }
            for f in &facts {
                println!("{}", fact_line(f));
            }
        }
        FactCommand::Rm(args) => {
            if db.delete_fact(parse_entry_id(&args.id)?)? {
                println!("Deleted.");
            } else {
                println!("No fact found with ID: {}", args.id);
            }
        }
    }
    Ok(())
}

/// Resolve the dossier a fact or story belongs to
pub(crate) fn lookup(store: &dyn DossierStore, identifier: &str) -> Result<Option<Dossier>> {
    if identifier.trim().is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }
    let found = find_dossier(store, identifier)?;
    if found.is_none() {
        println!("No dossier found.");
    }
    Ok(found)
}

/// Validate a YYYY-MM-DD date, defaulting to today
pub(crate) fn entry_date(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(date) => {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", date))?;
            Ok(date.to_string())
        }
        None => Ok(Local::now().format("%Y-%m-%d").to_string()),
    }
}

/// Body from the flag, or prompted when missing. A skipped prompt leaves it empty.
pub(crate) fn entry_body(body: Option<String>, prompt: &str) -> Result<Option<String>> {
    if let Some(text) = body {
        let text = text.trim().to_string();
        return Ok((!text.is_empty()).then_some(text));
    }
    let input = Text::new(prompt)
        .with_render_config(minimal_render_config())
        .prompt_skippable()?;
    Ok(input.filter(|t| !t.trim().is_empty()))
}

pub(crate) fn parse_entry_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| anyhow!("Invalid ID: {}", raw))
}

fn build_fact(dossier: &Dossier, args: EntryAddArgs) -> Result<Fact> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(anyhow!("Title cannot be empty."));
    }
    let mut fact = Fact::new(dossier.id.clone());
    fact.date = Some(entry_date(args.date.as_deref())?);
    fact.title = Some(title.to_string());
    fact.note = entry_body(args.body, "note:")?;
    Ok(fact)
}

fn fact_line(f: &Fact) -> String {
    let mut line = format!(
        "{}  {}",
        f.date.as_deref().unwrap_or("----------"),
        f.title.as_deref().unwrap_or("")
    );
    if let Some(ref note) = f.note {
        line.push_str(&format!(" — {}", truncate(note, 50)));
    }
    line.push_str(&format!("  [{}]", f.id));
    line
}
