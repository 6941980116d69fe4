//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and how their
//! arguments turn into model drafts and patches.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::model::record::DATE_FORMAT;
use crate::model::{parse_subjects, HomeworkStatus, RecordDraft, RecordPatch, SettingsPatch};
use crate::model::{StudentDraft, StudentPatch};

/// Student management commands.
#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Add a student
    Add {
        /// Student name
        name: String,

        #[command(flatten)]
        fields: StudentFields,
    },

    /// Edit a student
    Edit {
        /// Student id or exact name
        student: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        fields: StudentFields,
    },

    /// Delete a student and all of their records
    Delete {
        /// Student id or exact name
        student: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a student with all records
    Show {
        /// Student id or exact name
        student: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Optional student fields shared by `add` and `edit`.
#[derive(Debug, Args)]
pub struct StudentFields {
    /// School attended
    #[arg(short, long)]
    pub school: Option<String>,

    /// Subjects, separated by commas, slashes or semicolons (e.g. "數學, 英文")
    #[arg(long)]
    pub subjects: Option<String>,
}

impl StudentFields {
    /// Build the draft of a new student.
    #[must_use]
    pub fn into_draft(self, name: String) -> StudentDraft {
        StudentDraft {
            name: name.trim().to_string(),
            school: self.school.map(|s| s.trim().to_string()).unwrap_or_default(),
            subjects: self.subjects.as_deref().map(parse_subjects).unwrap_or_default(),
        }
    }

    /// Build a patch; fields not given are left alone.
    #[must_use]
    pub fn into_patch(self, name: Option<String>) -> StudentPatch {
        StudentPatch {
            name: name.map(|n| n.trim().to_string()),
            school: self.school.map(|s| s.trim().to_string()),
            subjects: self.subjects.as_deref().map(parse_subjects),
        }
    }
}

/// Record management commands.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Add a session record
    Add {
        /// Student id or exact name
        student: String,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Edit a session record; pass an empty value to clear a text field
    Edit {
        /// Student id or exact name
        student: String,

        /// Record id
        record: String,

        #[command(flatten)]
        fields: RecordFields,

        /// Remove the homework status
        #[arg(long, conflicts_with = "status")]
        clear_status: bool,
    },

    /// Delete a session record
    Delete {
        /// Student id or exact name
        student: String,

        /// Record id
        record: String,
    },
}

/// Record fields shared by `add` and `edit`.
#[derive(Debug, Default, Args)]
pub struct RecordFields {
    /// Session date, YYYY-MM-DD (defaults to today when adding)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Session time, HH:MM
    #[arg(short, long)]
    pub time: Option<String>,

    /// How the last homework went
    #[arg(long, value_enum)]
    pub status: Option<HomeworkStatusArg>,

    /// Weekly quiz score (free text, e.g. "85 分")
    #[arg(long)]
    pub score: Option<String>,

    /// Subject of this session
    #[arg(long)]
    pub subject: Option<String>,

    /// What was covered
    #[arg(long)]
    pub progress: Option<String>,

    /// Homework for next time
    #[arg(long)]
    pub next_homework: Option<String>,

    /// Attitude and focus during class
    #[arg(long)]
    pub condition: Option<String>,

    /// Notes for the parents
    #[arg(long)]
    pub parent: Option<String>,
}

impl RecordFields {
    /// Build the draft of a new record, dated `today` unless a date is given.
    #[must_use]
    pub fn into_draft(self, today: NaiveDate) -> RecordDraft {
        RecordDraft {
            date: self
                .date
                .unwrap_or_else(|| today.format(DATE_FORMAT).to_string()),
            time: self.time,
            homework_status: self.status.map(HomeworkStatus::from),
            weekly_score: self.score,
            subject: self.subject,
            progress: self.progress,
            next_homework: self.next_homework,
            class_condition: self.condition,
            parent_communication: self.parent,
        }
    }

    /// Build a patch; fields not given are left alone.
    #[must_use]
    pub fn into_patch(self, clear_status: bool) -> RecordPatch {
        let homework_status = if clear_status {
            Some(None)
        } else {
            self.status.map(|s| Some(HomeworkStatus::from(s)))
        };
        RecordPatch {
            date: self.date,
            time: self.time,
            homework_status,
            weekly_score: self.score,
            subject: self.subject,
            progress: self.progress,
            next_homework: self.next_homework,
            class_condition: self.condition,
            parent_communication: self.parent,
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Search name, school and subjects
    #[arg(short = 'Q', long)]
    pub query: Option<String>,

    /// Only students taking this subject
    #[arg(short, long)]
    pub subject: Option<String>,

    /// List the known subjects instead of students
    #[arg(long)]
    pub subjects: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Student id or exact name (all students when omitted)
    pub student: Option<String>,

    /// Reference day of the window, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub today: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Student id or exact name
    pub student: String,

    /// Number of latest records (defaults to the configured limit)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Reminders command arguments.
#[derive(Debug, Args)]
pub struct RemindersCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Academy settings commands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the academy settings
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Change the academy or teacher name
    Set {
        /// Academy name
        #[arg(short, long)]
        academy: Option<String>,

        /// Teacher name (empty to clear)
        #[arg(short, long)]
        teacher: Option<String>,
    },

    /// Set the logo from an image file
    Logo {
        /// Image file (png, jpeg, gif, webp, svg or bmp)
        file: PathBuf,
    },

    /// Remove the logo
    RemoveLogo,
}

impl SettingsCommand {
    /// The patch described by `set`, if this is a `set` command.
    #[must_use]
    pub fn set_patch(&self) -> Option<SettingsPatch> {
        match self {
            Self::Set { academy, teacher } => Some(SettingsPatch {
                academy_name: academy.clone(),
                teacher_name: teacher.clone(),
                logo_data_url: None,
            }),
            _ => None,
        }
    }
}

/// Backup commands.
#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Export all data to a JSON file
    Export {
        /// Output file (defaults to the dated backup name in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all students with the contents of a backup
    Import {
        /// Backup file
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Homework status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HomeworkStatusArg {
    /// All homework done
    Completed,
    /// Some of it done
    Partial,
    /// Not done
    Incomplete,
    /// Left at home
    NotBrought,
}

impl From<HomeworkStatusArg> for HomeworkStatus {
    fn from(arg: HomeworkStatusArg) -> Self {
        match arg {
            HomeworkStatusArg::Completed => Self::Completed,
            HomeworkStatusArg::Partial => Self::Partial,
            HomeworkStatusArg::Incomplete => Self::Incomplete,
            HomeworkStatusArg::NotBrought => Self::NotBrought,
        }
    }
}
