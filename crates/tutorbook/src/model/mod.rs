//! Data model of the record book.
//!
//! The whole book is one [`AppState`] document: students (each owning its
//! records) plus the academy [`Settings`]. Field names serialize in
//! camelCase so stored documents and backups keep the layout
//! `{ students: [...], settings: {...} }`.
//!
//! Reading is forgiving: missing fields take defaults, a legacy single
//! `subject` string becomes a one-element `subjects` list, and records are
//! put back into newest-first order.

mod de;
mod ids;
pub mod record;
pub mod settings;
pub mod student;

use serde::{Deserialize, Serialize};

pub use ids::{RecordId, StudentId};
pub use record::{HomeworkStatus, Record, RecordDraft, RecordPatch};
pub use settings::{Settings, SettingsPatch, DEFAULT_ACADEMY_NAME};
pub use student::{parse_subjects, Student, StudentDraft, StudentPatch};

/// The complete persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Students, ordered by name as of the last insert.
    #[serde(default, deserialize_with = "de::or_default")]
    pub students: Vec<Student>,
    /// Academy settings.
    #[serde(default, deserialize_with = "de::or_default")]
    pub settings: Settings,
}

impl AppState {
    /// Find a student by id.
    #[must_use]
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id.as_str() == id)
    }

    /// Total number of records across all students.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.students.iter().map(|s| s.records.len()).sum()
    }

    /// Parse a stored document, filling defaults for anything missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or has the wrong shape.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
