// src/presenter.rs

//! Result page: fetches a stored attempt and renders its score breakdown.

use std::fmt;

use crate::{
    models::{answer::Confidence, result::TestResult},
    session::{BackendError, TestBackend},
};

/// What the result page shows. Fetch failures become views, never panics.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Report(ResultReport),
    NotFound,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultReport {
    pub participant_name: Option<String>,
    pub result: TestResult,
}

impl ResultReport {
    /// Score with two decimals, e.g. `"66.67%"`.
    pub fn score(&self) -> String {
        self.result.score_display()
    }

    pub fn confidence_breakdown(&self) -> [(Confidence, usize); 3] {
        Confidence::ALL.map(|level| (level, self.result.confidence_counts.get(level)))
    }
}

/// Fetches the result for `(user_id, test_code)` and turns the outcome into a view.
pub async fn render<B>(
    backend: &B,
    user_id: &str,
    test_code: &str,
    participant_name: Option<&str>,
) -> ResultView
where
    B: TestBackend + ?Sized,
{
    if user_id.trim().is_empty() || test_code.trim().is_empty() {
        return ResultView::Error("Test code and user ID are required".to_string());
    }

    match backend.fetch_result(user_id, test_code).await {
        Ok(result) => ResultView::Report(ResultReport {
            participant_name: participant_name.map(str::to_string),
            result,
        }),
        Err(BackendError::NotFound(_)) => ResultView::NotFound,
        Err(e) => {
            tracing::warn!("Failed to load result for {} on {}: {}", user_id, test_code, e);
            ResultView::Error(e.to_string())
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultView::Report(report) => {
                writeln!(f, "Test Results")?;
                if let Some(name) = &report.participant_name {
                    writeln!(f, "Thank you for completing the test, {name}")?;
                }
                writeln!(f, "Your Score: {}", report.score())?;
                writeln!(
                    f,
                    "Correct Answers: {} / {}",
                    report.result.correct_answers, report.result.total_questions
                )?;
                writeln!(f, "Response Breakdown")?;
                for (level, count) in report.confidence_breakdown() {
                    writeln!(f, "  {}: {}", level.label(), count)?;
                }
                Ok(())
            }
            ResultView::NotFound => {
                writeln!(f, "No Results Found")?;
                writeln!(f, "No test results were found for this test code and user.")
            }
            ResultView::Error(message) => {
                writeln!(f, "Error")?;
                writeln!(f, "{message}")
            }
        }
    }
}
