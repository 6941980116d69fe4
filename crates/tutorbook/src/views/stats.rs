//! Homework and score statistics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::model::{HomeworkStatus, Record};

/// First signed decimal number in a score text.
static SCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid score regex"));

/// Count of records per homework status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HomeworkHistogram {
    /// Records marked completed.
    pub completed: usize,
    /// Records marked partial.
    pub partial: usize,
    /// Records marked incomplete.
    pub incomplete: usize,
    /// Records marked not brought.
    pub not_brought: usize,
}

impl HomeworkHistogram {
    /// Count for one status.
    #[must_use]
    pub fn get(&self, status: HomeworkStatus) -> usize {
        match status {
            HomeworkStatus::Completed => self.completed,
            HomeworkStatus::Partial => self.partial,
            HomeworkStatus::Incomplete => self.incomplete,
            HomeworkStatus::NotBrought => self.not_brought,
        }
    }

    fn bump(&mut self, status: HomeworkStatus) {
        let slot = match status {
            HomeworkStatus::Completed => &mut self.completed,
            HomeworkStatus::Partial => &mut self.partial,
            HomeworkStatus::Incomplete => &mut self.incomplete,
            HomeworkStatus::NotBrought => &mut self.not_brought,
        };
        *slot += 1;
    }

    /// Records with a status.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed + self.partial + self.incomplete + self.not_brought
    }

    /// Counts in display order.
    pub fn iter(&self) -> impl Iterator<Item = (HomeworkStatus, usize)> + '_ {
        HomeworkStatus::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// Count homework statuses; records without one are ignored.
pub fn homework_histogram<'a>(records: impl IntoIterator<Item = &'a Record>) -> HomeworkHistogram {
    records
        .into_iter()
        .filter_map(|r| r.homework_status)
        .fold(HomeworkHistogram::default(), |mut acc, status| {
            acc.bump(status);
            acc
        })
}

/// Extract the first number from free-text score input, e.g. `90 分` -> 90.
#[must_use]
pub fn parse_score(text: &str) -> Option<f64> {
    SCORE_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Average of the parsable weekly scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreSummary {
    /// Mean rounded to one decimal; `None` when no score parsed.
    pub average: Option<f64>,
    /// Number of scores that parsed.
    pub count: usize,
}

/// Average the weekly scores that contain a number.
pub fn score_summary<'a>(records: impl IntoIterator<Item = &'a Record>) -> ScoreSummary {
    let scores: Vec<f64> = records
        .into_iter()
        .filter_map(|r| r.weekly_score.as_deref())
        .filter_map(parse_score)
        .collect();

    if scores.is_empty() {
        return ScoreSummary::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    ScoreSummary {
        average: Some(round_one_decimal(mean)),
        count: scores.len(),
    }
}

/// Half-way values round up, so `-2.25` becomes `-2.2`.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordDraft, RecordId};

    fn scored(score: &str) -> Record {
        let mut draft = RecordDraft::on("2024-03-10");
        draft.weekly_score = Some(score.to_string());
        draft.into_record(RecordId::generate())
    }

    fn with_status(status: Option<HomeworkStatus>) -> Record {
        let mut draft = RecordDraft::on("2024-03-10");
        draft.homework_status = status;
        draft.into_record(RecordId::generate())
    }

    #[test]
    fn test_histogram_empty_is_zero() {
        let histogram = homework_histogram(std::iter::empty());
        assert_eq!(histogram, HomeworkHistogram::default());
        assert_eq!(histogram.total(), 0);
        assert!(histogram.iter().all(|(_, n)| n == 0));
    }

    #[test]
    fn test_histogram_counts() {
        let records = vec![
            with_status(Some(HomeworkStatus::Completed)),
            with_status(Some(HomeworkStatus::Completed)),
            with_status(Some(HomeworkStatus::NotBrought)),
            with_status(None),
        ];
        let histogram = homework_histogram(&records);
        assert_eq!(histogram.get(HomeworkStatus::Completed), 2);
        assert_eq!(histogram.get(HomeworkStatus::Partial), 0);
        assert_eq!(histogram.get(HomeworkStatus::NotBrought), 1);
        assert_eq!(histogram.total(), 3);
    }

    #[test]
    fn test_histogram_iter_display_order() {
        let order: Vec<_> = HomeworkHistogram::default().iter().map(|(s, _)| s).collect();
        assert_eq!(order, HomeworkStatus::ALL.to_vec());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("85"), Some(85.0));
        assert_eq!(parse_score("90 分"), Some(90.0));
        assert_eq!(parse_score("考了 72.5/100"), Some(72.5));
        assert_eq!(parse_score("-3"), Some(-3.0));
        assert_eq!(parse_score("not a number"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_score_summary_mixed_input() {
        let records = vec![scored("85"), scored("90 分"), scored("not a number")];
        let summary = score_summary(&records);
        assert_eq!(summary.average, Some(87.5));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_score_summary_rounds_to_one_decimal() {
        let records = vec![scored("80"), scored("85"), scored("86")];
        // 251 / 3 = 83.666...
        assert_eq!(score_summary(&records).average, Some(83.7));
    }

    #[test]
    fn test_score_summary_empty() {
        let summary = score_summary(std::iter::empty());
        assert_eq!(summary.average, None);
        assert_eq!(summary.count, 0);

        let records = vec![with_status(None)];
        assert_eq!(score_summary(&records), ScoreSummary::default());
    }

    #[test]
    fn test_round_half_up() {
        assert!((round_one_decimal(87.25) - 87.3).abs() < 1e-9);
        assert!((round_one_decimal(-2.25) - (-2.2)).abs() < 1e-9);
    }
}
