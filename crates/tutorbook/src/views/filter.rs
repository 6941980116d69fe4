//! Student search and subject filter.

use serde::{Deserialize, Serialize};

use crate::model::Student;

/// Search criteria for the student list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFilter {
    /// Free-text query; blank matches everyone.
    pub query: String,
    /// Exact subject label; `None` matches every subject.
    pub subject: Option<String>,
}

impl StudentFilter {
    /// Filter on a free-text query only.
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            subject: None,
        }
    }

    /// Restrict to students taking `subject`.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Whether `student` satisfies both criteria.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        self.matches_query(student) && self.matches_subject(student)
    }

    fn matches_query(&self, student: &Student) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let subjects = student.subjects_label(" ");
        let record_subjects = student.record_subjects().collect::<Vec<_>>().join(" ");
        [
            student.name.as_str(),
            student.school.as_str(),
            subjects.as_str(),
            record_subjects.as_str(),
        ]
        .iter()
        .filter(|field| !field.is_empty())
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_subject(&self, student: &Student) -> bool {
        let Some(subject) = self.subject.as_deref() else {
            return true;
        };
        student.subjects.iter().any(|s| s == subject)
            || student.record_subjects().any(|s| s == subject)
    }
}

/// Students matching `filter`, in list order.
#[must_use]
pub fn filter_students<'a>(students: &'a [Student], filter: &StudentFilter) -> Vec<&'a Student> {
    students.iter().filter(|s| filter.matches(s)).collect()
}

/// Distinct subject labels in first-seen order: each student's own
/// subjects, then the subjects found on its records.
#[must_use]
pub fn subject_options(students: &[Student]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for student in students {
        let labels = student
            .subjects
            .iter()
            .map(String::as_str)
            .chain(student.record_subjects());
        for label in labels {
            if !label.is_empty() && !options.iter().any(|o| o == label) {
                options.push(label.to_string());
            }
        }
    }
    options
}
