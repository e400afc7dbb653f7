//! Command-line configuration.
//!
//! Flags fall back to `COURSE_*` environment variables, then to defaults.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "course.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "course", version, about = "Student and group enrollment records")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long = "db", env = "COURSE_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "COURSE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "COURSE_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn resolved_log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| course_core::default_log_level().to_string())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Checks core wiring.
    Ping,
    /// Manages groups.
    #[command(subcommand)]
    Group(GroupCommand),
    /// Manages students.
    #[command(subcommand)]
    Student(StudentCommand),
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    Create {
        /// Display label, e.g. `P-101`.
        #[arg(long)]
        no: String,
        /// Maximum number of students.
        #[arg(long)]
        limit: u32,
    },
    List,
    Get {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    Create(StudentFields),
    List,
    Get {
        id: i64,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        fields: StudentFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct StudentFields {
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub email: String,
    /// Birth date as YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub birth_date: NaiveDate,
    #[arg(long)]
    pub group_id: i64,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{value}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, StudentCommand};
    use chrono::NaiveDate;
    use clap::Parser;

    #[test]
    fn parses_student_edit_with_global_db_flag() {
        let cli = Cli::try_parse_from([
            "course",
            "student",
            "edit",
            "3",
            "--full-name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--birth-date",
            "1815-12-10",
            "--group-id",
            "2",
            "--db",
            "/tmp/course-test.sqlite3",
        ])
        .unwrap();

        assert_eq!(
            cli.resolved_db_path().to_str(),
            Some("/tmp/course-test.sqlite3")
        );
        match cli.command {
            Command::Student(StudentCommand::Edit { id, fields }) => {
                assert_eq!(id, 3);
                assert_eq!(fields.group_id, 2);
                assert_eq!(
                    fields.birth_date,
                    NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_birth_date() {
        let result = Cli::try_parse_from([
            "course",
            "student",
            "create",
            "--full-name",
            "Ada",
            "--email",
            "ada@example.com",
            "--birth-date",
            "10.12.1815",
            "--group-id",
            "1",
        ]);
        assert!(result.is_err());
    }
}
