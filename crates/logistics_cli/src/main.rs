//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `logistics_core` linkage.
//! - Start file logging when a log directory is given.
//! - Print a summary of the planner stored at an optional SQLite path.
//!
//! Usage: `logistics_cli [--log-dir <absolute-dir>] [db-path]`

use logistics_core::{
    core_version, default_log_level, flush_logging, init_logging, open_db, open_db_in_memory,
    ping, DocumentStore, KeyValueStorage, PlannerView, SqliteStorage,
};
use std::process::ExitCode;

#[derive(Debug, Default)]
struct CliArgs {
    db_path: Option<String>,
    log_dir: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        if arg == "--log-dir" {
            let dir = args
                .next()
                .ok_or_else(|| "--log-dir requires a directory".to_string())?;
            parsed.log_dir = Some(dir);
        } else if parsed.db_path.is_none() {
            parsed.db_path = Some(arg);
        } else {
            return Err(format!("unexpected argument `{arg}`"));
        }
    }
    Ok(parsed)
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: logistics_cli [--log-dir <absolute-dir>] [db-path]");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("failed to initialize logging: {err}");
        }
    }

    println!("logistics_core ping={}", ping());
    println!("logistics_core version={}", core_version());

    let code = run(args.db_path);
    flush_logging();
    code
}

fn run(db_path: Option<String>) -> ExitCode {
    let conn = match db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open planner storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = DocumentStore::load(SqliteStorage::new(&conn));
    print_summary(&store);
    ExitCode::SUCCESS
}

fn print_summary<S: KeyValueStorage>(store: &DocumentStore<S>) {
    let view = PlannerView::build(store.current());
    println!(
        "planner source={:?} days={} slots={} queued={} placed={}",
        store.load_source(),
        view.days.len(),
        view.slots.len(),
        view.queue.len(),
        view.placed_count()
    );
    for row in &view.days {
        let cells = row
            .cells
            .iter()
            .map(|cell| {
                cell.customer
                    .as_ref()
                    .map_or("-", |customer| customer.name())
            })
            .collect::<Vec<_>>()
            .join(" | ");
        println!("day+{} {}", row.day, cells);
    }
}
