//! Opaque identifiers for students and records.
//!
//! New identifiers are random UUID v4 strings. Identifiers read from stored
//! data are kept verbatim, so ids written by earlier versions stay valid.
//! Numeric ids are read as their decimal text; a `null` or blank id is
//! replaced by a fresh one.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                Ok(super::de::text(deserializer)?.map_or_else(Self::generate, Self))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a student.
    StudentId
);

string_id!(
    /// Identifier of a record.
    RecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_uuid() {
        let id = StudentId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_generate_unique() {
        let ids: std::collections::HashSet<RecordId> =
            (0..1000).map(|_| RecordId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_legacy_id_kept_verbatim() {
        let id: StudentId = serde_json::from_str(r#""lq3x9k0abc123""#).unwrap();
        assert_eq!(id.as_str(), "lq3x9k0abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""lq3x9k0abc123""#);
    }

    #[test]
    fn test_numeric_id_read_as_text() {
        let id: RecordId = serde_json::from_str("1700").unwrap();
        assert_eq!(id.as_str(), "1700");
    }

    #[test]
    fn test_null_or_blank_id_is_regenerated() {
        let id: StudentId = serde_json::from_str("null").unwrap();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        let id: StudentId = serde_json::from_str(r#""  ""#).unwrap();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(RecordId::from("r-1").to_string(), "r-1");
    }
}
