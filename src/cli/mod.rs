use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::StoreKind;
use crate::db::Database;
use crate::store::DossierStore;
use crate::transfer::{Format, ImportMode};

pub mod add;
pub mod delete;
pub mod display;
pub mod edit;
pub mod export;
pub mod fact;
pub mod import;
pub mod list;
pub mod photo;
pub mod show;
pub mod stats;
pub mod story;
pub mod ui;

pub use add::run_add;
pub use delete::run_delete;
pub use display::print_dossier;
pub use edit::run_edit;
pub use export::run_export;
pub use fact::run_fact;
pub use import::run_import;
pub use list::{run_list, ListFilter, SortOrder};
pub use photo::run_photo;
pub use show::run_show;
pub use stats::run_stats;
pub use story::run_story;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Personal dossiers for the command line")]
#[command(version)]
pub struct Cli {
    /// Directory holding the store [env: DOSSIER_HOME]
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Storage backend [env: DOSSIER_STORE]
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new dossier
    Add(AddArgs),
    /// List dossiers
    List(ListArgs),
    /// Show full details for a dossier
    Show(ShowArgs),
    /// Change fields of a dossier
    Edit(EditArgs),
    /// Delete a dossier
    Delete(DeleteArgs),
    /// Set or clear a dossier's photo
    Photo(PhotoArgs),
    /// Dated facts about a person (sqlite store)
    #[command(subcommand)]
    Fact(FactCommand),
    /// Longer stories about a person (sqlite store)
    #[command(subcommand)]
    Story(StoryCommand),
    /// Import dossiers from a CSV or JSON file
    Import(ImportArgs),
    /// Export all dossiers as CSV or JSON
    Export(ExportArgs),
    /// Summary numbers for the collection
    Stats,
}

/// Profile fields shared by `add` and `edit`
#[derive(Args, Debug, Default, Clone)]
pub struct ProfileArgs {
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub parents: Option<String>,
    #[arg(long)]
    pub history: Option<String>,
    #[arg(long)]
    pub traumas: Option<String>,
    #[arg(long)]
    pub habits: Option<String>,
    #[arg(long)]
    pub communication: Option<String>,
    /// 0 to 5
    #[arg(short, long)]
    pub friendliness: Option<i64>,
    #[arg(short, long)]
    pub relation: Option<String>,
    /// Date of last contact (YYYY-MM-DD)
    #[arg(long)]
    pub last_contact: Option<String>,
    /// Comma-separated tags
    #[arg(short, long)]
    pub tags: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: String,
    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Args)]
pub struct ListArgs {
    /// Match against name, tags and relation
    pub query: Option<String>,
    #[arg(short, long, default_value = "0")]
    pub min_friendliness: u8,
    #[arg(long)]
    pub with_photo: bool,
    #[arg(short, long, value_enum, default_value_t = SortOrder::UpdatedDesc)]
    pub sort: SortOrder,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Dossier id or name
    pub identifier: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Dossier id or name
    pub identifier: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Dossier id or name
    pub identifier: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct PhotoArgs {
    /// Dossier id or name
    pub identifier: String,
    /// Path to image file (jpg, png, gif, webp)
    pub path: Option<PathBuf>,
    /// Store a remote image URL instead of a file
    #[arg(short, long, conflicts_with = "path")]
    pub url: Option<String>,
    /// Clear existing photo
    #[arg(short, long, conflicts_with_all = ["path", "url"])]
    pub clear: bool,
}

#[derive(Subcommand)]
pub enum FactCommand {
    /// Record a fact
    Add(EntryAddArgs),
    /// List facts, newest first
    List(EntryListArgs),
    /// Remove a fact by id
    Rm(EntryRemoveArgs),
}

#[derive(Subcommand)]
pub enum StoryCommand {
    /// Record a story
    Add(EntryAddArgs),
    /// List stories, newest first
    List(EntryListArgs),
    /// Remove a story by id
    Rm(EntryRemoveArgs),
}

#[derive(Args)]
pub struct EntryAddArgs {
    /// Dossier id or name
    pub identifier: String,
    #[arg(short, long)]
    pub title: String,
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
    /// Body text
    #[arg(short, long)]
    pub body: Option<String>,
}

#[derive(Args)]
pub struct EntryListArgs {
    /// Dossier id or name
    pub identifier: String,
}

#[derive(Args)]
pub struct EntryRemoveArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ImportArgs {
    pub path: PathBuf,
    /// Defaults to the file extension
    #[arg(long, value_enum)]
    pub format: Option<Format>,
    #[arg(short, long, value_enum, default_value_t = ImportMode::Merge)]
    pub mode: ImportMode,
    /// Report what would change without saving
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file, stdout when omitted
    pub path: Option<PathBuf>,
    /// Defaults to the file extension, CSV on stdout
    #[arg(long, value_enum)]
    pub format: Option<Format>,
    /// Leave out the UTF-8 byte order mark on CSV output
    #[arg(long)]
    pub no_bom: bool,
}

/// Run one command. `db` is present only when the SQLite store is in use,
/// which is what facts and stories need.
pub fn run_command(command: Commands, store: &dyn DossierStore, db: Option<&Database>) -> Result<()> {
    match command {
        Commands::Add(args) => run_add(store, &args.name, &args.profile),
        Commands::List(args) => {
            let filter = ListFilter {
                query: args.query,
                min_friendliness: args.min_friendliness,
                with_photo: args.with_photo,
            };
            run_list(store, &filter, args.sort)
        }
        Commands::Show(args) => run_show(store, db, &args.identifier),
        Commands::Edit(args) => run_edit(store, &args.identifier, args.name, &args.profile),
        Commands::Delete(args) => run_delete(store, &args.identifier, args.force),
        Commands::Photo(args) => run_photo(
            store,
            &args.identifier,
            args.path.as_deref(),
            args.url.as_deref(),
            args.clear,
        ),
        Commands::Fact(cmd) => run_fact(store, require_db(db)?, cmd),
        Commands::Story(cmd) => run_story(store, require_db(db)?, cmd),
        Commands::Import(args) => run_import(store, &args.path, args.format, args.mode, args.dry_run),
        Commands::Export(args) => {
            run_export(store, args.path.as_deref(), args.format, !args.no_bom)
        }
        Commands::Stats => run_stats(store),
    }
}

fn require_db(db: Option<&Database>) -> Result<&Database> {
    db.ok_or_else(|| anyhow!("Facts and stories require the sqlite store (--store sqlite)."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dossier", "list", "--store", "json", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.store, Some(StoreKind::Json));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_parse_import_defaults() {
        let cli = Cli::try_parse_from(["dossier", "import", "people.csv"]).unwrap();
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.mode, ImportMode::Merge);
        assert!(args.format.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_add_requires_name() {
        assert!(Cli::try_parse_from(["dossier", "add"]).is_err());
    }

    #[test]
    fn test_fact_commands_need_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open_in(dir.path()).unwrap();
        let cmd = FactCommand::List(EntryListArgs {
            identifier: "x".to_string(),
        });
        let err = run_command(Commands::Fact(cmd), &store, None).unwrap_err();
        assert!(err.to_string().contains("sqlite"));
    }
}
