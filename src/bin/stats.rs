use clap::Parser;
use relimport::{audit, config::Config, db::Db, error::RelimportError};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Show relation counts and recent import runs")]
struct Args {
    /// Number of recent import runs to show
    #[arg(short, long, default_value_t = 10)]
    runs: usize,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TypeCount {
    type_id: i64,
    label: Option<String>,
    count: i64,
}

#[derive(Debug, Serialize)]
struct Stats {
    total_relations: i64,
    by_type: Vec<TypeCount>,
    recent_runs: Vec<audit::ImportRunRecord>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let db = Db::new(config.db_path());
    let culture = config.import.default_culture.clone();
    let runs = args.runs;

    let stats = db.with_connection(move |conn| {
        let total_relations: i64 =
            conn.query_row("SELECT COUNT(*) FROM relation", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT r.type_id, t.name, COUNT(*) AS count
            FROM relation r
            LEFT JOIN term_i18n t ON t.id = r.type_id AND t.culture = ?1
            GROUP BY r.type_id, t.name
            ORDER BY count DESC
            "#
        )?;
        let by_type = stmt
            .query_map([&culture], |row| {
                Ok(TypeCount {
                    type_id: row.get(0)?,
                    label: row.get(1)?,
                    count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let recent_runs = audit::recent_runs(conn, runs)?;

        Ok::<Stats, RelimportError>(Stats {
            total_relations,
            by_type,
            recent_runs,
        })
    }).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n=== Relation Statistics ===\n");
    println!("Total relations: {}\n", stats.total_relations);

    if !stats.by_type.is_empty() {
        println!("{:-<60}", "");
        println!("{:<10} {:<38} {:>10}", "Type ID", "Label", "Count");
        println!("{:-<60}", "");
        for row in &stats.by_type {
            println!(
                "{:<10} {:<38} {:>10}",
                row.type_id,
                row.label.as_deref().unwrap_or("(no label)"),
                row.count
            );
        }
        println!("{:-<60}", "");
    }

    if stats.recent_runs.is_empty() {
        println!("\nNo import runs recorded.");
        return Ok(());
    }

    println!("\nRecent Import Runs:\n");
    println!("{:-<101}", "");
    println!(
        "{:<26} {:<30} {:>7} {:>8} {:>6} {:>8} {:>4} {:>6}",
        "Started", "File", "Rows", "Created", "Dupes", "Missing", "Self", "Errors"
    );
    println!("{:-<101}", "");
    for run in &stats.recent_runs {
        let status = if run.finished_at.is_some() { "" } else { " (aborted)" };
        println!(
            "{:<26} {:<30} {:>7} {:>8} {:>6} {:>8} {:>4} {:>6}{}",
            run.started_at,
            truncate(&run.filename, 30),
            run.rows_read,
            run.persisted,
            run.duplicates,
            run.missing_actors,
            run.self_relations,
            run.errored,
            status
        );
    }
    println!("{:-<101}", "");
    println!();

    Ok(())
}

/// Keep the tail of long paths, which carries the file name.
fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - (max - 1)).collect();
    format!("…{}", tail)
}
