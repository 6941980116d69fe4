//! Error types for tutorbook.
//!
//! Storage failures inside `load`/`save` are logged rather than returned (see
//! [`crate::storage`]); the variants here cover everything a caller can
//! actually observe: opening the database, configuration, backup payloads and
//! rejected user input.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tutorbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Backup Errors ===
    /// A backup file could not be used for import.
    #[error("invalid backup: {reason}")]
    InvalidBackup {
        /// Why the payload was rejected.
        reason: String,
    },

    // === Input Errors ===
    /// User supplied a value the record book does not accept.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// No student with the given id exists.
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// No record with the given id exists for the student.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tutorbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the named field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create an invalid backup error.
    #[must_use]
    pub fn invalid_backup(reason: impl Into<String>) -> Self {
        Self::InvalidBackup {
            reason: reason.into(),
        }
    }

    /// Check if this error came from a rejected backup payload.
    #[must_use]
    pub fn is_invalid_backup(&self) -> bool {
        matches!(self, Self::InvalidBackup { .. })
    }

    /// Check if this error is a not-found lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound(_) | Self::RecordNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "invalid name: must not be empty");
    }

    #[test]
    fn test_invalid_backup_error() {
        let err = Error::invalid_backup("`students` must be an array");
        assert!(err.is_invalid_backup());
        assert!(err.to_string().contains("students"));
        assert!(!Error::StudentNotFound("x".to_string()).is_invalid_backup());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::StudentNotFound("abc".to_string()).is_not_found());
        assert!(Error::RecordNotFound("abc".to_string()).is_not_found());
        assert!(!Error::validation("date", "bad").is_not_found());
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::StudentNotFound("s-1".to_string());
        assert_eq!(err.to_string(), "student not found: s-1");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "slot_key must not be empty".to_string(),
        };
        assert!(err.to_string().contains("slot_key"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
