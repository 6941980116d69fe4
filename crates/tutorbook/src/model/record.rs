//! Per-session evaluation records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::de;
use super::RecordId;
use crate::error::{Error, Result};

/// Wire format of a record date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format of a record time of day.
pub const TIME_FORMAT: &str = "%H:%M";

/// How the student handled the homework assigned in the previous session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    /// All homework done.
    Completed,
    /// Some of it done.
    Partial,
    /// Not done.
    Incomplete,
    /// Homework left at home.
    NotBrought,
}

impl HomeworkStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [
        Self::Completed,
        Self::Partial,
        Self::Incomplete,
        Self::NotBrought,
    ];

    /// Label shown on lists and reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "已完成",
            Self::Partial => "部分完成",
            Self::Incomplete => "未完成",
            Self::NotBrought => "未攜帶",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Partial => write!(f, "partial"),
            Self::Incomplete => write!(f, "incomplete"),
            Self::NotBrought => write!(f, "not_brought"),
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(Self::Completed),
            "partial" => Ok(Self::Partial),
            "incomplete" => Ok(Self::Incomplete),
            "not_brought" => Ok(Self::NotBrought),
            other => Err(Error::validation(
                "homework status",
                format!("unknown value `{other}`"),
            )),
        }
    }
}

/// One tutoring session entry belonging to a student.
///
/// `date` is kept as the literal stored string so that a value which does
/// not parse survives a load/save cycle; derived views treat it as having no
/// date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Record identifier.
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,

    /// Session date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "de::text_or_empty")]
    pub date: String,

    /// Session start time, `HH:MM`.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Homework status; unknown stored values read as `None`.
    #[serde(
        default,
        deserialize_with = "de::homework_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub homework_status: Option<HomeworkStatus>,

    /// Weekly quiz score as typed, e.g. `85 分`.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub weekly_score: Option<String>,

    /// Subject taught in this session, when it differs per record.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// What was covered.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,

    /// Homework assigned for next time.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub next_homework: Option<String>,

    /// Attitude and focus during class.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub class_condition: Option<String>,

    /// Notes shared with parents.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub parent_communication: Option<String>,
}

impl Record {
    /// The session date, if the stored string is a valid calendar date.
    #[must_use]
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// The session date and time; a missing time counts as midnight and an
    /// unreadable time falls back to the date alone.
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let date = self.calendar_date()?;
        let time = self
            .time
            .as_deref()
            .and_then(parse_time)
            .unwrap_or(NaiveTime::MIN);
        Some(date.and_time(time))
    }
}

/// Fields of a record about to be created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    /// Session date, `YYYY-MM-DD`.
    pub date: String,
    /// Session time, `HH:MM`.
    pub time: Option<String>,
    /// Homework status.
    pub homework_status: Option<HomeworkStatus>,
    /// Weekly score text.
    pub weekly_score: Option<String>,
    /// Record-level subject.
    pub subject: Option<String>,
    /// Progress notes.
    pub progress: Option<String>,
    /// Next homework.
    pub next_homework: Option<String>,
    /// Class condition.
    pub class_condition: Option<String>,
    /// Parent communication.
    pub parent_communication: Option<String>,
}

impl RecordDraft {
    /// Create a draft for the given date with every other field empty.
    #[must_use]
    pub fn on(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Check the date and time are well formed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or malformed date or time.
    pub fn validate(&self) -> Result<()> {
        validate_date(&self.date)?;
        if let Some(time) = &self.time {
            validate_time(time)?;
        }
        Ok(())
    }

    /// Turn the draft into a record with the given id.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            date: self.date,
            time: de::non_empty(self.time),
            homework_status: self.homework_status,
            weekly_score: de::non_empty(self.weekly_score),
            subject: de::non_empty(self.subject),
            progress: de::non_empty(self.progress),
            next_homework: de::non_empty(self.next_homework),
            class_condition: de::non_empty(self.class_condition),
            parent_communication: de::non_empty(self.parent_communication),
        }
    }
}

/// Partial update of a record. `None` leaves a field alone; an empty string
/// clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    /// New date.
    pub date: Option<String>,
    /// New time.
    pub time: Option<String>,
    /// New homework status; `Some(None)` clears it.
    pub homework_status: Option<Option<HomeworkStatus>>,
    /// New weekly score.
    pub weekly_score: Option<String>,
    /// New subject.
    pub subject: Option<String>,
    /// New progress notes.
    pub progress: Option<String>,
    /// New next homework.
    pub next_homework: Option<String>,
    /// New class condition.
    pub class_condition: Option<String>,
    /// New parent communication.
    pub parent_communication: Option<String>,
}

impl RecordPatch {
    /// Check any new date or time is well formed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed date or time.
    pub fn validate(&self) -> Result<()> {
        if let Some(date) = &self.date {
            validate_date(date)?;
        }
        if let Some(time) = self.time.as_deref().filter(|t| !t.is_empty()) {
            validate_time(time)?;
        }
        Ok(())
    }

    /// Merge the provided fields into `record`.
    pub fn apply(&self, record: &mut Record) {
        if let Some(date) = &self.date {
            record.date.clone_from(date);
        }
        if let Some(status) = self.homework_status {
            record.homework_status = status;
        }
        merge_text(&mut record.time, self.time.as_ref());
        merge_text(&mut record.weekly_score, self.weekly_score.as_ref());
        merge_text(&mut record.subject, self.subject.as_ref());
        merge_text(&mut record.progress, self.progress.as_ref());
        merge_text(&mut record.next_homework, self.next_homework.as_ref());
        merge_text(&mut record.class_condition, self.class_condition.as_ref());
        merge_text(
            &mut record.parent_communication,
            self.parent_communication.as_ref(),
        );
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn merge_text(field: &mut Option<String>, value: Option<&String>) {
    if let Some(value) = value {
        *field = de::non_empty(Some(value.clone()));
    }
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parse an `HH:MM` (or `HH:MM:SS`) time.
#[must_use]
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn validate_date(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation("date", "a session date is required"));
    }
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| Error::validation("date", format!("`{value}` is not a YYYY-MM-DD date")))
}

fn validate_time(value: &str) -> Result<()> {
    parse_time(value)
        .map(|_| ())
        .ok_or_else(|| Error::validation("time", format!("`{value}` is not an HH:MM time")))
}

/// Order two optional dates newest first, undated entries last.
#[must_use]
pub fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of records by date, newest first.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| newest_first(a.calendar_date(), b.calendar_date()));
}
