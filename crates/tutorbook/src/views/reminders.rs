//! Who was seen most recently.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::record::newest_first;
use crate::model::{Record, Student};

/// A student paired with their most recent dated record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReminderItem<'a> {
    /// The student.
    pub student: &'a Student,
    /// Most recent record with a valid date.
    pub latest: Option<&'a Record>,
    /// Date of `latest`.
    pub latest_date: Option<NaiveDate>,
}

/// Most recent record of a student. The first record holding the maximum
/// date wins, whatever order the records are in.
#[must_use]
pub fn latest_dated_record(student: &Student) -> Option<(&Record, NaiveDate)> {
    student
        .records
        .iter()
        .filter_map(|r| r.calendar_date().map(|d| (r, d)))
        .fold(None, |best, (record, date)| match best {
            Some((_, best_date)) if best_date >= date => best,
            _ => Some((record, date)),
        })
}

/// Every student with their latest record, most recently seen first.
/// Students with no dated record go last, in list order.
#[must_use]
pub fn reminders(students: &[Student]) -> Vec<ReminderItem<'_>> {
    let mut items: Vec<ReminderItem<'_>> = students
        .iter()
        .map(|student| {
            let latest = latest_dated_record(student);
            ReminderItem {
                student,
                latest: latest.map(|(r, _)| r),
                latest_date: latest.map(|(_, d)| d),
            }
        })
        .collect();
    items.sort_by(|a, b| newest_first(a.latest_date, b.latest_date));
    items
}
