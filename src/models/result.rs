// src/models/result.rs

use serde::{Deserialize, Serialize};

use crate::models::answer::{Confidence, SubmittedAnswer};

/// Fixed-size count of answers per confidence level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceTally {
    #[serde(rename = "very-confident", default)]
    pub very_confident: usize,
    #[serde(default)]
    pub unsure: usize,
    #[serde(rename = "dont-know", default)]
    pub dont_know: usize,
}

impl ConfidenceTally {
    pub fn record(&mut self, level: Confidence) {
        *self.slot_mut(level) += 1;
    }

    pub fn get(&self, level: Confidence) -> usize {
        match level {
            Confidence::VeryConfident => self.very_confident,
            Confidence::Unsure => self.unsure,
            Confidence::DontKnow => self.dont_know,
        }
    }

    pub fn total(&self) -> usize {
        self.very_confident + self.unsure + self.dont_know
    }

    fn slot_mut(&mut self, level: Confidence) -> &mut usize {
        match level {
            Confidence::VeryConfident => &mut self.very_confident,
            Confidence::Unsure => &mut self.unsure,
            Confidence::DontKnow => &mut self.dont_know,
        }
    }
}

impl FromIterator<Confidence> for ConfidenceTally {
    fn from_iter<I: IntoIterator<Item = Confidence>>(iter: I) -> Self {
        let mut tally = ConfidenceTally::default();
        for level in iter {
            tally.record(level);
        }
        tally
    }
}

/// Represents one row of `results.json`: the outcome of a single attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub user_id: String,
    pub test_code: String,

    /// Percentage of correct answers, 0-100, unrounded.
    pub score: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    #[serde(default)]
    pub confidence_counts: ConfidenceTally,

    /// Answers submitted without a confidence level.
    #[serde(default)]
    pub confidence_unset: usize,

    /// Submission timestamp as reported by the client (RFC 3339).
    #[serde(default)]
    pub end_time: String,
}

impl TestResult {
    /// Score formatted the way the result page shows it.
    pub fn score_display(&self) -> String {
        format!("{:.2}%", self.score)
    }
}

/// DTO for submitting a completed attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestRequest {
    pub user_id: String,
    pub test_code: String,
    pub answers: Vec<SubmittedAnswer>,
    #[serde(default)]
    pub end_time: Option<String>,
}
