//! Academy identity shown on lists and reports.

use serde::{Deserialize, Serialize};

use super::de;
use crate::error::{Error, Result};

/// Academy name used until the user sets one.
pub const DEFAULT_ACADEMY_NAME: &str = "台北全真一對一補習班";

/// Singleton business settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettings")]
pub struct Settings {
    /// Academy display name, trimmed and never blank.
    pub academy_name: String,
    /// Teacher shown on reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    /// Logo as an inline `data:` URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_data_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            academy_name: DEFAULT_ACADEMY_NAME.to_string(),
            teacher_name: None,
            logo_data_url: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default, deserialize_with = "de::text")]
    academy_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    teacher_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    logo_data_url: Option<String>,
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        Self {
            academy_name: stored
                .academy_name
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| DEFAULT_ACADEMY_NAME.to_string()),
            teacher_name: stored.teacher_name.map(|name| name.trim().to_string()),
            logo_data_url: stored.logo_data_url,
        }
    }
}

/// Partial update of the settings. An empty teacher name or logo clears
/// the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    /// New academy name.
    #[serde(default)]
    pub academy_name: Option<String>,
    /// New teacher name.
    #[serde(default)]
    pub teacher_name: Option<String>,
    /// New logo data URL.
    #[serde(default)]
    pub logo_data_url: Option<String>,
}

impl SettingsPatch {
    /// Trim names and reject a blank academy name.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the academy name is blank.
    pub fn normalized(self) -> Result<Self> {
        let academy_name = match self.academy_name {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::validation(
                    "academy name",
                    "the academy name must not be blank",
                ));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        Ok(Self {
            academy_name,
            teacher_name: self.teacher_name.map(|name| name.trim().to_string()),
            logo_data_url: self.logo_data_url,
        })
    }

    /// Merge the provided fields into `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(name) = &self.academy_name {
            settings.academy_name.clone_from(name);
        }
        if let Some(teacher) = &self.teacher_name {
            settings.teacher_name = de::non_empty(Some(teacher.clone()));
        }
        if let Some(logo) = &self.logo_data_url {
            settings.logo_data_url = de::non_empty(Some(logo.clone()));
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            academy_name: Some(settings.academy_name),
            teacher_name: Some(settings.teacher_name.unwrap_or_default()),
            logo_data_url: Some(settings.logo_data_url.unwrap_or_default()),
        }
    }
}
