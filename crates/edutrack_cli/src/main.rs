//! CLI entry point.
//!
//! # Responsibility
//! - Open (or create) the local SQLite store and run bootstrap/migration.
//! - Print a deterministic profile summary for quick local checks.
//!
//! Usage: `edutrack_cli [db_path]`. `EDUTRACK_LOG_DIR` enables file logs.

use edutrack_core::config::default_db_file_name;
use edutrack_core::db::open_db;
use edutrack_core::{
    core_version, default_log_level, init_logging, DocumentStore, HttpScoringClient,
    ScoringConfig, SqliteKvBackend, TrackerService,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("EDUTRACK_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| default_db_file_name().to_string());

    println!("edutrack_core version={}", core_version());
    println!("store path={db_path}");

    let conn = open_db(&db_path)?;
    let store = DocumentStore::new(SqliteKvBackend::new(&conn));
    let scoring = HttpScoringClient::new(&ScoringConfig::from_env());
    let tracker = TrackerService::new(&store, scoring);

    let active = tracker.get_active_profile()?;
    for summary in tracker.list_profiles()? {
        let marker = if summary.id == active.id { "*" } else { " " };
        println!("{marker} {} {}", summary.id, summary.name);
    }

    let record = tracker.get_data()?;
    println!(
        "active semesters={} subjects={} attendance_subjects={} cgpa={:.2}",
        record.semesters.len(),
        record.all_subjects().count(),
        record.attendance().len(),
        record.student.cgpa
    );
    Ok(())
}
