//! Per-student overview shown on the student list.

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::{filter_students, StudentFilter};
use super::stats::{homework_histogram, score_summary, HomeworkHistogram, ScoreSummary};
use super::window::records_in_window;
use crate::model::{Record, Student};

/// One student's card on the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary<'a> {
    /// The student.
    pub student: &'a Student,
    /// Homework statuses of the records inside the window.
    pub window_homework: HomeworkHistogram,
    /// Scores of the records inside the window.
    pub window_scores: ScoreSummary,
    /// All records of the student.
    pub record_count: usize,
    /// Leading records in stored order, newest first.
    pub recent: Vec<&'a Record>,
}

/// The filtered student list with its counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListing<'a> {
    /// Students matching the filter.
    pub shown: usize,
    /// All students.
    pub total: usize,
    /// Cards of the matching students, in list order.
    pub students: Vec<StudentSummary<'a>>,
}

/// Build the card of one student.
#[must_use]
pub fn summarize<'a>(
    student: &'a Student,
    today: NaiveDate,
    window_days: u64,
    recent_limit: usize,
) -> StudentSummary<'a> {
    let in_window = records_in_window(&student.records, today, window_days);
    StudentSummary {
        student,
        window_homework: homework_histogram(in_window.iter().copied()),
        window_scores: score_summary(in_window.iter().copied()),
        record_count: student.records.len(),
        recent: student.records.iter().take(recent_limit).collect(),
    }
}

/// Filter the students and build a card for each match.
#[must_use]
pub fn student_listing<'a>(
    students: &'a [Student],
    filter: &StudentFilter,
    today: NaiveDate,
    window_days: u64,
    recent_limit: usize,
) -> StudentListing<'a> {
    let matches = filter_students(students, filter);
    StudentListing {
        shown: matches.len(),
        total: students.len(),
        students: matches
            .into_iter()
            .map(|s| summarize(s, today, window_days, recent_limit))
            .collect(),
    }
}
