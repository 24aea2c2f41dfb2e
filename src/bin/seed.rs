use anyhow::Result;
use clap::Parser;
use relimport::db::{migrate, Db};
use relimport::seed::{apply_seed, load_seed_file};
use relimport::store::SqliteStore;
use relimport::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Load actors and relation type terms from a TOML fixture")]
struct Args {
    /// Seed file
    filename: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let seed = load_seed_file(&args.filename)?;
    let taxonomy_id = config.import.taxonomy_id;

    let db = Db::new(config.db_path());
    let migrations_dir = config.migrations_dir().to_path_buf();
    let counts = db.with_connection(move |conn| {
        migrate::run_migrations(conn, &migrations_dir)?;
        let tx = conn.transaction()?;
        let counts = apply_seed(&SqliteStore::new(&tx), &seed, taxonomy_id)?;
        tx.commit()?;
        Ok(counts)
    }).await?;

    log::info!(
        "Seeded {} actor name(s) and {} term label(s) into taxonomy {}",
        counts.actors,
        counts.terms,
        taxonomy_id
    );

    Ok(())
}
