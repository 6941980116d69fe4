//! `tutorbook` - A local record book for one-to-one tutoring
//!
//! This library keeps students, per-session evaluation records and academy
//! settings in a single JSON document stored in a local `SQLite` slot, and
//! computes the derived views shown by the `tutorbook` command line: search,
//! recent-activity window, latest-N report, homework and score statistics,
//! and follow-up reminders.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod logo;
pub mod model;
pub mod mutate;
pub mod report;
pub mod storage;
pub mod store;
pub mod views;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{AppState, HomeworkStatus, Record, Settings, Student};
pub use storage::{Storage, StorageStats};
pub use store::Store;
