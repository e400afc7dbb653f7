//! Command-line entry point for course enrollment records.
//!
//! Prints one JSON envelope per invocation and exits non-zero on failure.

mod api;
mod cli;

use clap::Parser;
use cli::Cli;
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = course_core::init_logging(&cli.resolved_log_level(), log_dir) {
            eprintln!("course: logging disabled: {err}");
        }
    }

    let db_path = cli.resolved_db_path();
    info!(
        "event=cli_start module=cli status=start db_path={}",
        db_path.display()
    );
    let response = api::dispatch(&db_path, cli.command);

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("course: failed to render response: {err}");
            return ExitCode::FAILURE;
        }
    }

    if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
