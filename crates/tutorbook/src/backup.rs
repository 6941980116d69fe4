//! JSON backup export and import.
//!
//! An export is the stored document plus an `exportedAt` timestamp, pretty
//! printed. Import accepts any JSON object carrying a `students` array;
//! `settings`, when present, is merged over the current settings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{AppState, Settings, SettingsPatch, Student};
use crate::mutate::ImportPayload;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    students: &'a [Student],
    settings: &'a Settings,
    exported_at: String,
}

/// Render `state` as a backup document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_payload(state: &AppState, exported_at: DateTime<Utc>) -> Result<String> {
    let document = ExportDocument {
        students: &state.students,
        settings: &state.settings,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Default file name of a backup taken on `date`.
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("學生評量表備份_{}.json", date.format("%Y-%m-%d"))
}

/// Parse and check a backup document.
///
/// # Errors
///
/// Returns [`Error::InvalidBackup`] when the text is not JSON, is not an
/// object, lacks a `students` array, or holds students or settings of the
/// wrong shape.
pub fn parse_import(text: &str) -> Result<ImportPayload> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::invalid_backup(format!("not a JSON document ({e})")))?;

    let Value::Object(mut object) = value else {
        return Err(Error::invalid_backup("expected a JSON object"));
    };

    let students = match object.remove("students") {
        Some(students @ Value::Array(_)) => serde_json::from_value::<Vec<Student>>(students)
            .map_err(|e| Error::invalid_backup(format!("unreadable student data ({e})")))?,
        Some(_) => return Err(Error::invalid_backup("`students` is not an array")),
        None => return Err(Error::invalid_backup("missing `students` array")),
    };

    let settings = match object.remove("settings") {
        Some(Value::Null) | None => None,
        Some(settings @ Value::Object(_)) => {
            let mut patch: SettingsPatch = serde_json::from_value(settings)
                .map_err(|e| Error::invalid_backup(format!("unreadable settings ({e})")))?;
            if patch.academy_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                debug!("Ignoring blank academy name in backup");
                patch.academy_name = None;
            }
            Some(patch.normalized()?)
        }
        Some(_) => {
            warn!("Backup `settings` is not an object, ignoring it");
            None
        }
    };

    Ok(ImportPayload { students, settings })
}
