//! Command-line interface for tutorbook.
//!
//! This module provides the CLI structure for the `tutorbook` binary; the
//! handlers live in `main.rs`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BackupCommand, ConfigCommand, HomeworkStatusArg, ListCommand, RecordCommand, RecordFields,
    RemindersCommand, ReportCommand, SettingsCommand, StatsCommand, StatusCommand,
    StudentCommand, StudentFields,
};

/// tutorbook - Keep track of one-to-one tutoring sessions
///
/// Records students, per-session evaluations and academy settings in a local
/// database, and prints the student list, recent statistics, reminders and
/// evaluation reports.
#[derive(Debug, Parser)]
#[command(name = "tutorbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, edit, delete or show students
    #[command(subcommand)]
    Student(StudentCommand),

    /// Add, edit or delete session records
    #[command(subcommand)]
    Record(RecordCommand),

    /// List students with their recent activity
    List(ListCommand),

    /// Homework and score statistics over the recent window
    Stats(StatsCommand),

    /// Evaluation report of a student's latest records
    Report(ReportCommand),

    /// Students ordered by their latest session
    Reminders(RemindersCommand),

    /// View or change the academy settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Export or import a JSON backup
    #[command(subcommand)]
    Backup(BackupCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "tutorbook");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["tutorbook", "-q", "status"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["tutorbook", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["tutorbook", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["tutorbook", "-vv", "status"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_student_add() {
        let cli = parse(&[
            "tutorbook",
            "student",
            "add",
            "王小明",
            "--school",
            "建中",
            "--subjects",
            "數學, 英文",
        ]);
        let Command::Student(StudentCommand::Add { name, fields }) = cli.command else {
            panic!("expected student add");
        };
        assert_eq!(name, "王小明");
        assert_eq!(fields.school.as_deref(), Some("建中"));
        assert_eq!(fields.subjects.as_deref(), Some("數學, 英文"));
    }

    #[test]
    fn test_parse_record_add() {
        let cli = parse(&[
            "tutorbook",
            "record",
            "add",
            "王小明",
            "-d",
            "2024-03-10",
            "--status",
            "not-brought",
            "--score",
            "85 分",
        ]);
        let Command::Record(RecordCommand::Add { student, fields }) = cli.command else {
            panic!("expected record add");
        };
        assert_eq!(student, "王小明");
        assert_eq!(fields.date.as_deref(), Some("2024-03-10"));
        assert_eq!(fields.status, Some(HomeworkStatusArg::NotBrought));
    }

    #[test]
    fn test_parse_record_edit_clear_status_conflicts() {
        let result = Cli::try_parse_from([
            "tutorbook",
            "record",
            "edit",
            "s",
            "r",
            "--status",
            "partial",
            "--clear-status",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list() {
        let cli = parse(&["tutorbook", "list", "-Q", "amy", "--subject", "數學", "--json"]);
        let Command::List(list) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(list.query.as_deref(), Some("amy"));
        assert_eq!(list.subject.as_deref(), Some("數學"));
        assert!(list.json);
    }

    #[test]
    fn test_parse_report_limit() {
        let cli = parse(&["tutorbook", "report", "s1", "-n", "5"]);
        assert!(matches!(
            cli.command,
            Command::Report(ReportCommand { limit: Some(5), .. })
        ));
    }

    #[test]
    fn test_parse_backup_import() {
        let cli = parse(&["tutorbook", "backup", "import", "backup.json", "--yes"]);
        assert!(matches!(
            cli.command,
            Command::Backup(BackupCommand::Import { yes: true, .. })
        ));
    }

    #[test]
    fn test_parse_settings_remove_logo() {
        let cli = parse(&["tutorbook", "settings", "remove-logo"]);
        assert!(matches!(
            cli.command,
            Command::Settings(SettingsCommand::RemoveLogo)
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["tutorbook", "-c", "/custom/config.toml", "reminders"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
