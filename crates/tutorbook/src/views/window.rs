//! Recent-activity window and latest-N selection.

use chrono::{Days, NaiveDate};

use crate::model::Record;

/// Default number of days before today included in the window.
pub const DEFAULT_WINDOW_DAYS: u64 = 7;

/// Default number of records in a latest-N selection.
pub const DEFAULT_LATEST_LIMIT: usize = 8;

/// Closed calendar interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateWindow {
    /// Whether `date` falls inside the window, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The window ending today and reaching `days` days back.
///
/// With the default of 7 this covers 8 calendar days.
#[must_use]
pub fn window_range(today: NaiveDate, days: u64) -> DateWindow {
    DateWindow {
        start: today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN),
        end: today,
    }
}

/// Records dated inside the window, oldest first. Records sharing a date
/// keep their relative order; undated records are left out.
#[must_use]
pub fn records_in_window(records: &[Record], today: NaiveDate, days: u64) -> Vec<&Record> {
    let window = window_range(today, days);
    let mut found: Vec<&Record> = records
        .iter()
        .filter(|r| r.calendar_date().is_some_and(|d| window.contains(d)))
        .collect();
    found.sort_by_key(|r| r.calendar_date());
    found
}

/// The `n` most recent records by date and time, newest first.
///
/// Records without a valid date are dropped. A missing time counts as
/// midnight.
#[must_use]
pub fn latest_records(records: &[Record], n: usize) -> Vec<&Record> {
    let mut ranked: Vec<_> = records
        .iter()
        .filter_map(|r| r.timestamp().map(|ts| (ts, r)))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| b.cmp(a));
    ranked.into_iter().take(n).map(|(_, r)| r).collect()
}

/// Heading for a latest-N selection, e.g. `最新 8 筆（2024-01-05 ~ 2024-03-01）`.
#[must_use]
pub fn latest_range_label(records: &[&Record]) -> String {
    let count = records.len();
    if count == 0 {
        return "最新 0 筆".to_string();
    }

    let stamped: Option<Vec<_>> = records
        .iter()
        .map(|r| r.timestamp().map(|ts| (ts, r.date.as_str())))
        .collect();

    let range = stamped.and_then(|stamped| {
        let start = stamped.iter().min_by_key(|(ts, _)| *ts)?.1;
        let end = stamped.iter().max_by_key(|(ts, _)| *ts)?.1;
        Some((start, end))
    });

    match range {
        Some((start, end)) => format!("最新 {count} 筆（{start} ~ {end}）"),
        None => format!("最新 {count} 筆"),
    }
}
