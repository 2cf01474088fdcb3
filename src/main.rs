use clap::Parser;
use dossier::cli::{run_command, Cli};
use dossier::config::{Config, StoreKind};
use dossier::db::Database;
use dossier::store::JsonFileStore;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.store)?;
    log::debug!(
        "data dir {}, {} store",
        config.data_dir.display(),
        config.store.as_str()
    );

    match config.store {
        StoreKind::Sqlite => {
            let db = Database::open_in(&config.data_dir)?;
            run_command(cli.command, &db, Some(&db))
        }
        StoreKind::Json => {
            let store = JsonFileStore::open_in(&config.data_dir)?;
            run_command(cli.command, &store, None)
        }
    }
}
