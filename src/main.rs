use anyhow::{Context, Result};
use clap::Parser;
use relimport::db::{migrate, Db};
use relimport::{run_import, Config, ImportOptions};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "relimport")]
#[command(about = "Import authority record relations using CSV data")]
struct Args {
    /// CSV file to import
    filename: PathBuf,

    /// Index relations for search during import
    #[arg(long)]
    index: bool,

    /// Config file (defaults to RELIMPORT_CONFIG or ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", &config.relimport.log_level)
    ).init();

    log::debug!("Database path: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    let migrations_dir = config.migrations_dir().to_path_buf();
    db.with_connection(move |conn| {
        migrate::run_migrations(conn, &migrations_dir)
    }).await?;

    let options = ImportOptions::from_config(&config.import, args.index);
    if options.index {
        log::info!("Search indexing enabled for this run");
    }

    let start = Instant::now();
    let filename = args.filename.clone();
    let summary = db
        .with_connection(move |conn| run_import(conn, &filename, &options))
        .await
        .with_context(|| format!("Import of {} failed", args.filename.display()))?;

    log::info!("Time: {:?}", start.elapsed());
    if summary.errored > 0 || summary.missing_actors > 0 {
        log::warn!("Some rows were not imported. Check logs above for details.");
    }

    Ok(())
}
