//! Lenient field readers for stored JSON.
//!
//! Stored documents come from older versions of the app and from hand-edited
//! backups, so optional text may arrive as `null`, `""`, a number or a
//! string. All of them are read without failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::HomeworkStatus;

/// Read optional text; numbers are kept as their decimal rendering and
/// blank strings become `None`.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

/// Read text that is always present, `null` and blanks becoming `""`.
pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

/// Read a value that may be `null`, falling back to its default.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a homework status, mapping unknown values to `None`.
pub(crate) fn homework_status<'de, D>(deserializer: D) -> Result<Option<HomeworkStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(value_to_text)
        .and_then(|s| s.parse().ok()))
}

/// Read a list of labels, skipping blanks and non-string entries.
pub(crate) fn labels<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(value_to_text).collect()),
        Some(other) => value_to_text(other).map(|label| vec![label]),
        None => None,
    })
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `None` for missing or blank text.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
