//! Students and their owned record sequences.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::record::{sort_records, Record};
use super::{de, StudentId};
use crate::error::{Error, Result};

/// Separators accepted between subjects typed on one line.
static SUBJECT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[，、,/;]+").expect("valid subject separator regex"));

/// A tutoring client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredStudent")]
pub struct Student {
    /// Student identifier.
    pub id: StudentId,
    /// Display name, never blank.
    pub name: String,
    /// School attended; empty when unknown.
    pub school: String,
    /// Subjects taught.
    pub subjects: Vec<String>,
    /// Session records, newest first.
    pub records: Vec<Record>,
}

/// Student as found in stored JSON, before normalization.
#[derive(Deserialize)]
struct StoredStudent {
    #[serde(default = "StudentId::generate")]
    id: StudentId,
    #[serde(default, deserialize_with = "de::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    school: Option<String>,
    #[serde(default, deserialize_with = "de::labels")]
    subjects: Option<Vec<String>>,
    /// Single subject written by the first version of the app.
    #[serde(default, deserialize_with = "de::text")]
    subject: Option<String>,
    #[serde(default, deserialize_with = "de::or_default")]
    records: Vec<Record>,
}

impl From<StoredStudent> for Student {
    fn from(stored: StoredStudent) -> Self {
        let subjects = match stored.subjects {
            Some(subjects) if !subjects.is_empty() => subjects,
            _ => stored.subject.into_iter().collect(),
        };
        let mut records = stored.records;
        sort_records(&mut records);
        Self {
            id: stored.id,
            name: stored.name.unwrap_or_default(),
            school: stored.school.unwrap_or_default(),
            subjects,
            records,
        }
    }
}

impl Student {
    /// Subjects joined for display, e.g. `數學 / 英文`.
    #[must_use]
    pub fn subjects_label(&self, separator: &str) -> String {
        self.subjects.join(separator)
    }

    /// Find a record by id.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }

    /// Record-level subjects, in record order, blanks skipped.
    pub fn record_subjects(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|r| r.subject.as_deref())
    }
}

/// Fields of a student about to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    /// Student name.
    pub name: String,
    /// School.
    pub school: String,
    /// Subjects.
    pub subjects: Vec<String>,
}

impl StudentDraft {
    /// Create a draft with a name and nothing else.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the name is present.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Partial update of a student. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    /// New name.
    pub name: Option<String>,
    /// New school.
    pub school: Option<String>,
    /// New subject list.
    pub subjects: Option<Vec<String>>,
}

impl StudentPatch {
    /// Check a new name, if any, is present.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new name is blank.
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    /// Merge the provided fields into `student`.
    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name.clone_from(name);
        }
        if let Some(school) = &self.school {
            student.school.clone_from(school);
        }
        if let Some(subjects) = &self.subjects {
            student.subjects.clone_from(subjects);
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(Error::validation("name", "a student name is required"))
    } else {
        Ok(())
    }
}

/// Split a typed subject line such as `數學, 英文/理化` into labels.
#[must_use]
pub fn parse_subjects(input: &str) -> Vec<String> {
    SUBJECT_SEPARATOR
        .split(input)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Name ordering used for the student list: case-insensitive first, then
/// the exact text so that distinct names never compare equal by accident.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort of students by name.
pub fn sort_students(students: &mut [Student]) {
    students.sort_by(|a, b| compare_names(&a.name, &b.name));
}
