//! Derived views over the record book.
//!
//! Everything here is a pure function of the current students or records
//! and is recomputed on every query; nothing is cached or stored.

pub mod filter;
pub mod reminders;
pub mod stats;
pub mod summary;
pub mod window;

pub use filter::{filter_students, subject_options, StudentFilter};
pub use reminders::{reminders, ReminderItem};
pub use stats::{homework_histogram, parse_score, score_summary, HomeworkHistogram, ScoreSummary};
pub use summary::{student_listing, summarize, StudentListing, StudentSummary};
pub use window::{latest_range_label, latest_records, records_in_window, window_range};
