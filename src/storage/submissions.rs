// src/storage/submissions.rs

use std::path::Path;

use super::{JsonCollection, StoreError};
use crate::models::{
    answer::{AnswerRecord, Confidence, OptionLetter, SubmittedAnswer},
    fields::parse_blank,
    result::{ConfidenceTally, SubmitTestRequest, TestResult},
};

pub const ANSWERS_FILE: &str = "answers.json";
pub const RESULTS_FILE: &str = "results.json";

/// Append-only storage for submitted answers and their derived results.
pub struct SubmissionStore {
    answers: JsonCollection<AnswerRecord>,
    results: JsonCollection<TestResult>,
}

impl SubmissionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            answers: JsonCollection::new(data_dir.join(ANSWERS_FILE)),
            results: JsonCollection::new(data_dir.join(RESULTS_FILE)),
        }
    }

    /// Scores a submission and appends its answers and result.
    ///
    /// Both collection locks are taken (answers, then results) before either
    /// file is touched, and the answers are written first: once a result is
    /// visible, its answers are too. There is no atomicity across the two
    /// files and no deduplication; a repeated submission is a new attempt.
    pub async fn append_submission(
        &self,
        request: SubmitTestRequest,
    ) -> Result<TestResult, StoreError> {
        let user_id = request.user_id.trim().to_string();
        let test_code = request.test_code.trim().to_string();
        if user_id.is_empty() || test_code.is_empty() {
            return Err(StoreError::Validation(
                "User ID and test code are required".to_string(),
            ));
        }

        let records = to_records(&user_id, &test_code, request.answers)?;
        let end_time = request
            .end_time
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
        let result = score(&user_id, &test_code, &records, end_time)?;

        let mut answers = self.answers.writer().await;
        let mut results = self.results.writer().await;

        answers.append(records).await.inspect_err(|e| {
            tracing::error!("Failed to append answers for {}: {}", user_id, e);
        })?;
        results.append(vec![result.clone()]).await.inspect_err(|e| {
            tracing::error!("Answers stored but result append failed for {}: {}", user_id, e);
        })?;

        tracing::info!(
            "Stored result for user {} on {}: {}/{} correct",
            result.user_id,
            result.test_code,
            result.correct_answers,
            result.total_questions
        );

        Ok(result)
    }

    /// The most recent result for `(user_id, test_code)`.
    /// Test codes compare case-insensitively, as package lookups do.
    pub async fn fetch_result(&self, user_id: &str, test_code: &str) -> Result<TestResult, StoreError> {
        let user_id = user_id.trim();
        let test_code = test_code.trim();

        self.results
            .load()
            .await?
            .into_iter()
            .rev()
            .find(|r| r.user_id == user_id && r.test_code.eq_ignore_ascii_case(test_code))
            .ok_or_else(|| {
                StoreError::NotFound("No results found for this user and test code".to_string())
            })
    }
}

fn to_records(
    user_id: &str,
    test_code: &str,
    answers: Vec<SubmittedAnswer>,
) -> Result<Vec<AnswerRecord>, StoreError> {
    answers
        .into_iter()
        .map(|a| {
            let invalid = |source| StoreError::InvalidAnswer {
                question_id: a.question_id.clone(),
                source,
            };
            let answer: Option<OptionLetter> = parse_blank(&a.answer).map_err(invalid)?;
            let confidence: Option<Confidence> = parse_blank(&a.confidence).map_err(invalid)?;

            Ok(AnswerRecord {
                user_id: user_id.to_string(),
                test_code: test_code.to_string(),
                question_id: a.question_id,
                answer,
                confidence,
                correct_answer: a.correct_answer,
                subtopic_id: a.subtopic_id,
                competence: a.competence,
            })
        })
        .collect()
}

/// Derives the result for one attempt. An empty attempt has no defined
/// score and is rejected.
pub fn score(
    user_id: &str,
    test_code: &str,
    records: &[AnswerRecord],
    end_time: String,
) -> Result<TestResult, StoreError> {
    if records.is_empty() {
        return Err(StoreError::EmptySubmission);
    }

    let total_questions = records.len();
    let correct_answers = records.iter().filter(|r| r.is_correct()).count();
    let confidence_counts: ConfidenceTally = records.iter().filter_map(|r| r.confidence).collect();

    Ok(TestResult {
        user_id: user_id.to_string(),
        test_code: test_code.to_string(),
        score: 100.0 * correct_answers as f64 / total_questions as f64,
        total_questions,
        correct_answers,
        confidence_counts,
        confidence_unset: total_questions - confidence_counts.total(),
        end_time,
    })
}
