//! Command-line front end for the classification engine.
//!
//! # Responsibility
//! - Print the linked `quadrant_core` version.
//! - Classify and normalize one ad-hoc text from the command line.
//! - Refresh a SQLite task file through `SyncCoordinator`.
//! - Start file logging when `--log-dir <absolute dir>` is given.

use quadrant_core::db::open_db;
use quadrant_core::{
    classify, default_log_level, flush_logs, init_logging, normalize, Quadrant, RawRecord,
    Record, SqliteTaskStore, SyncConfig, SyncCoordinator,
};
use std::process::ExitCode;

const USAGE: &str = "usage: quadrant_cli [--log-dir <dir>] [classify <notes> [title] [container] | refresh <db_path>]";

fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let code = run(&mut args);
    flush_logs();
    code
}

fn run(args: &mut Vec<String>) -> ExitCode {
    match take_flag_value(args, "--log-dir") {
        Ok(Some(dir)) => {
            if let Err(err) = init_logging(default_log_level(), &dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        Ok(None) => {}
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    }

    println!("quadrant_core version={}", quadrant_core::core_version());
    match args.first().map(String::as_str) {
        None => ExitCode::SUCCESS,
        Some("classify") if args.len() >= 2 => {
            let notes = args[1].as_str();
            let title = args.get(2).map_or("", String::as_str);
            let container = args.get(3).map_or("", String::as_str);
            print_classification(notes, title, container);
            ExitCode::SUCCESS
        }
        Some("refresh") if args.len() == 2 => refresh(&args[1]),
        Some(_) => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn print_classification(notes: &str, title: &str, container: &str) {
    let quadrant = classify(notes, title, container);
    match quadrant {
        Some(quadrant) => println!("quadrant={}", quadrant.label()),
        None => println!("quadrant=unassigned"),
    }
    let raw = RawRecord::new(title, notes, container);
    let record = normalize(&Record::from_raw(&raw, quadrant));
    println!("tags={}", record.structured_tags.join(" "));
    println!("notes:\n{}", record.notes);
}

fn refresh(db_path: &str) -> ExitCode {
    let mut conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let store = match SqliteTaskStore::try_new(&mut conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut coordinator = SyncCoordinator::new(store, SyncConfig::default());
    match coordinator.refresh() {
        Ok(report) => {
            println!(
                "fetched={} classified={} unassigned={} written={} failed={}",
                report.fetched,
                report.classified,
                report.unassigned,
                report.written,
                report.failures.len()
            );
            for quadrant in Quadrant::ALL {
                println!(
                    "{}={}",
                    quadrant.label(),
                    coordinator.records_in_quadrant(quadrant).len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("refresh failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Removes `flag <value>` from `args` and returns the value.
fn take_flag_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>, String> {
    let Some(index) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(format!("{flag} needs a value"));
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}
