//! Evaluation report for a student's latest sessions.
//!
//! [`build_report`] gathers what the printed evaluation sheet shows: the
//! academy header, the student, and the latest records oldest first. Drawing
//! it is left to the presentation layer; [`Report::render_text`] gives a
//! plain-text version for the terminal.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{HomeworkStatus, Record, Settings, Student};
use crate::views::window::{latest_range_label, latest_records};

/// Heading printed on every report.
pub const REPORT_TITLE: &str = "學生評量表";

/// Format of the generation timestamp.
const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Shown for an empty cell.
const PLACEHOLDER: &str = "—";

/// One table row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// Session date.
    pub date: String,
    /// Session time.
    pub time: Option<String>,
    /// Subject of the session, falling back to the student's first subject.
    pub subject: Option<String>,
    /// Homework status of the session.
    pub homework_status: Option<HomeworkStatus>,
    /// Weekly score text.
    pub weekly_score: Option<String>,
    /// Progress notes.
    pub progress: Option<String>,
    /// Homework for next time.
    pub next_homework: Option<String>,
    /// Class condition.
    pub class_condition: Option<String>,
    /// Parent communication.
    pub parent_communication: Option<String>,
}

impl ReportRow {
    fn from_record(record: &Record, fallback_subject: Option<&str>) -> Self {
        Self {
            date: record.date.clone(),
            time: record.time.clone(),
            subject: record
                .subject
                .clone()
                .or_else(|| fallback_subject.map(String::from)),
            homework_status: record.homework_status,
            weekly_score: record.weekly_score.clone(),
            progress: record.progress.clone(),
            next_homework: record.next_homework.clone(),
            class_condition: record.class_condition.clone(),
            parent_communication: record.parent_communication.clone(),
        }
    }
}

/// Everything shown on an evaluation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Academy display name.
    pub academy_name: String,
    /// Teacher, when set.
    pub teacher_name: Option<String>,
    /// Academy logo as a `data:` URL, when set.
    pub logo_data_url: Option<String>,
    /// Student name.
    pub student_name: String,
    /// Student school.
    pub school: String,
    /// Student subjects joined with ` / `.
    pub subjects_label: String,
    /// Heading describing the selection, e.g. `最新 8 筆（...）`.
    pub range_label: String,
    /// When the report was generated, `YYYY-MM-DD HH:MM`.
    pub generated_at: String,
    /// Suggested image file name.
    pub file_name: String,
    /// Rows, oldest first.
    pub rows: Vec<ReportRow>,
}

/// Build the report of the `limit` latest records of `student`.
///
/// Returns `None` when the student has no dated record to export.
#[must_use]
pub fn build_report(
    student: &Student,
    settings: &Settings,
    now: NaiveDateTime,
    limit: usize,
) -> Option<Report> {
    let latest = latest_records(&student.records, limit);
    if latest.is_empty() {
        return None;
    }

    let range_label = latest_range_label(&latest);
    let fallback_subject = student.subjects.first().map(String::as_str);

    // `latest` is newest first and every entry has a timestamp.
    let mut rows: Vec<(NaiveDateTime, ReportRow)> = latest
        .iter()
        .filter_map(|r| {
            r.timestamp()
                .map(|ts| (ts, ReportRow::from_record(r, fallback_subject)))
        })
        .collect();
    rows.sort_by_key(|(ts, _)| *ts);

    Some(Report {
        academy_name: settings.academy_name.clone(),
        teacher_name: settings.teacher_name.clone(),
        logo_data_url: settings.logo_data_url.clone(),
        student_name: student.name.clone(),
        school: student.school.clone(),
        subjects_label: student.subjects_label(" / "),
        range_label,
        generated_at: now.format(GENERATED_AT_FORMAT).to_string(),
        file_name: report_file_name(&student.name, latest.len()),
        rows: rows.into_iter().map(|(_, row)| row).collect(),
    })
}

/// Default image file name of a report.
#[must_use]
pub fn report_file_name(student_name: &str, count: usize) -> String {
    format!("評量表_{student_name}_最新{count}筆.png")
}

fn cell(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(PLACEHOLDER)
}

impl Report {
    /// Plain-text rendering for the terminal.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {REPORT_TITLE}", self.academy_name)?;
        writeln!(f, "期間：{}", self.range_label)?;
        writeln!(f, "學生姓名：{}", cell(Some(self.student_name.as_str())))?;
        writeln!(f, "就讀學校：{}", cell(Some(self.school.as_str())))?;
        writeln!(f, "上課科目：{}", cell(Some(self.subjects_label.as_str())))?;
        if let Some(teacher) = &self.teacher_name {
            writeln!(f, "授課教師：{teacher}")?;
        }

        for row in &self.rows {
            writeln!(f)?;
            write!(f, "{row}")?;
        }

        writeln!(f)?;
        write!(f, "匯出時間：{}", self.generated_at)
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}  {}",
            self.date,
            cell(self.time.as_deref()),
            cell(self.subject.as_deref())
        )?;
        writeln!(
            f,
            "  上次作業：{}",
            self.homework_status.map_or(PLACEHOLDER, HomeworkStatus::label)
        )?;
        writeln!(f, "  週考成績：{}", cell(self.weekly_score.as_deref()))?;
        writeln!(f, "  授課進度：{}", cell(self.progress.as_deref()))?;
        writeln!(f, "  下次作業範圍：{}", cell(self.next_homework.as_deref()))?;
        writeln!(f, "  上課狀況：{}", cell(self.class_condition.as_deref()))?;
        writeln!(
            f,
            "  學習進度與家長溝通：{}",
            cell(self.parent_communication.as_deref())
        )
    }
}
