// src/session/mod.rs

//! Client-side test session: question navigation, answer capture, submission.
//!
//! A session is driven by one participant and owned by one caller, so every
//! transition takes `&mut self` and completes before the next one starts.
//!
//! ```text
//! Loading ──▶ Active ──▶ Submitting ──▶ Submitted
//!               ▲  │            │
//!               └──┘ navigate   └──▶ Active (submission failed)
//! ```

pub mod backend;
pub mod client;

use thiserror::Error;

use crate::models::{
    answer::{Answer, Confidence, OptionLetter, SubmittedAnswer},
    question::Question,
    result::SubmitTestRequest,
    user::CreateUserRequest,
};

pub use backend::{BackendError, LocalBackend, TestBackend};
pub use client::HttpBackend;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("question set for '{test_code}' is unavailable: {reason}")]
    QuestionSetUnavailable { test_code: String, reason: String },

    #[error("test code '{0}' does not exist")]
    InvalidTestCode(String),

    #[error("registration failed: {0}")]
    RegistrationFailed(#[source] BackendError),

    #[error("question {index} is out of range (session has {len} questions)")]
    OutOfRange { index: usize, len: usize },

    #[error("the test has already been submitted")]
    SessionClosed,

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("submission failed: {0}")]
    SubmitFailed(#[source] BackendError),
}

/// Who is taking the test. Passed in explicitly; sessions share no globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: String,
    pub test_code: String,
    pub name: Option<String>,
}

impl Participant {
    pub fn new(user_id: impl Into<String>, test_code: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            test_code: test_code.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Submitting,
    Submitted,
}

/// Dialog flags a UI layer renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modals {
    pub image_preview: bool,
    pub submit_confirmation: bool,
    pub incomplete_warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved(usize),
    /// The current question is half answered; the warning is now showing.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Some answers are incomplete; the confirmation prompt is now showing.
    NeedsConfirmation,
    Submitted(ResultLocation),
}

/// Where the stored result of a submitted session can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLocation {
    pub user_id: String,
    pub test_code: String,
}

/// Navigator-grid status of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Blank,
    Partial,
    Complete(Confidence),
}

pub struct TestSession<B> {
    backend: B,
    participant: Participant,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    current: usize,
    phase: SessionPhase,
    modals: Modals,
    last_error: Option<String>,
}

impl<B: TestBackend> TestSession<B> {
    /// Loads the participant's question set and opens the session on the
    /// first question with every answer blank.
    pub async fn initialize(backend: B, participant: Participant) -> Result<Self, SessionError> {
        let unavailable = |reason: String| SessionError::QuestionSetUnavailable {
            test_code: participant.test_code.clone(),
            reason,
        };

        let questions = backend
            .fetch_questions(&participant.test_code)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if questions.is_empty() {
            return Err(unavailable("package contains no questions".to_string()));
        }

        tracing::debug!(
            "Session for {} opened on {} ({} questions)",
            participant.user_id,
            participant.test_code,
            questions.len()
        );

        Ok(Self {
            answers: vec![Answer::default(); questions.len()],
            backend,
            participant,
            questions,
            current: 0,
            phase: SessionPhase::Active,
            modals: Modals::default(),
            last_error: None,
        })
    }

    /// Welcome-screen flow: validate the code, register, then load the test.
    /// No participant is created for an unknown code.
    pub async fn start(backend: B, registration: CreateUserRequest) -> Result<Self, SessionError> {
        let test_code = registration.test_code.trim().to_string();

        let exists = backend
            .validate_test_code(&test_code)
            .await
            .map_err(|e| SessionError::QuestionSetUnavailable {
                test_code: test_code.clone(),
                reason: e.to_string(),
            })?;
        if !exists {
            return Err(SessionError::InvalidTestCode(test_code));
        }

        let user = backend
            .register(registration)
            .await
            .map_err(SessionError::RegistrationFailed)?;

        let participant = Participant {
            user_id: user.user_id.to_string(),
            test_code,
            name: Some(user.name),
        };

        Self::initialize(backend, participant).await
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn modals(&self) -> Modals {
        self.modals
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn current_answer(&self) -> Answer {
        self.answers[self.current]
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn set_answer(&mut self, option: OptionLetter) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.answers[self.current].option = Some(option);
        Ok(())
    }

    pub fn set_confidence(&mut self, level: Confidence) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.answers[self.current].confidence = Some(level);
        Ok(())
    }

    /// Moves to `target` unless the current question is half answered.
    ///
    /// A blank question may be skipped; a partial one may not.
    pub fn navigate(&mut self, target: usize) -> Result<Navigation, SessionError> {
        self.ensure_editable()?;
        if target >= self.questions.len() {
            return Err(SessionError::OutOfRange {
                index: target,
                len: self.questions.len(),
            });
        }

        if self.answers[self.current].is_partial() {
            self.modals.incomplete_warning = true;
            return Ok(Navigation::Blocked);
        }

        self.current = target;
        self.modals.image_preview = false;
        Ok(Navigation::Moved(target))
    }

    /// Next question; stays put on the last one.
    pub fn next(&mut self) -> Result<Navigation, SessionError> {
        if self.current + 1 >= self.questions.len() {
            self.ensure_editable()?;
            return Ok(Navigation::Moved(self.current));
        }
        self.navigate(self.current + 1)
    }

    /// Previous question; stays put on the first one.
    pub fn previous(&mut self) -> Result<Navigation, SessionError> {
        if self.current == 0 {
            self.ensure_editable()?;
            return Ok(Navigation::Moved(0));
        }
        self.navigate(self.current - 1)
    }

    pub fn dismiss_warning(&mut self) {
        self.modals.incomplete_warning = false;
    }

    /// Opens the enlarged image; returns false when the question has none.
    pub fn open_image_preview(&mut self) -> bool {
        self.modals.image_preview = self.current_question().has_image();
        self.modals.image_preview
    }

    pub fn close_image_preview(&mut self) {
        self.modals.image_preview = false;
    }

    pub fn status(&self, index: usize) -> Option<QuestionStatus> {
        self.answers.get(index).map(|a| match (a.option, a.confidence) {
            (Some(_), Some(level)) => QuestionStatus::Complete(level),
            (None, None) => QuestionStatus::Blank,
            _ => QuestionStatus::Partial,
        })
    }

    pub fn complete_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_complete()).count()
    }

    pub fn has_incomplete(&self) -> bool {
        self.answers.iter().any(|a| !a.is_complete())
    }

    /// Submits right away when every question is complete; otherwise raises
    /// the confirmation prompt and waits for [`Self::confirm_submit`].
    pub async fn request_submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        self.ensure_editable()?;
        if self.has_incomplete() {
            self.modals.submit_confirmation = true;
            return Ok(SubmitOutcome::NeedsConfirmation);
        }
        self.submit().await.map(SubmitOutcome::Submitted)
    }

    /// "Yes" on the confirmation prompt.
    pub async fn confirm_submit(&mut self) -> Result<ResultLocation, SessionError> {
        self.submit().await
    }

    /// "No" on the confirmation prompt.
    pub fn cancel_submit(&mut self) {
        self.modals.submit_confirmation = false;
    }

    /// Sends every answer, enriched from its question, to the backend.
    ///
    /// On failure the session returns to `Active` with the error recorded;
    /// nothing is retried.
    pub async fn submit(&mut self) -> Result<ResultLocation, SessionError> {
        match self.phase {
            SessionPhase::Submitted => return Err(SessionError::SessionClosed),
            SessionPhase::Submitting => return Err(SessionError::SubmissionInProgress),
            SessionPhase::Active => {}
        }

        let request = self.build_submission(chrono::Utc::now());
        self.last_error = None;

        // Dropping this future mid-request puts the session back in Active.
        let phase = SubmittingPhase::enter(&mut self.phase);
        let outcome = self.backend.submit(request).await;
        self.modals.submit_confirmation = false;

        match outcome {
            Ok(()) => {
                phase.finish(SessionPhase::Submitted);
                tracing::info!(
                    "Submitted {} answers for {} on {}",
                    self.answers.len(),
                    self.participant.user_id,
                    self.participant.test_code
                );
                Ok(ResultLocation {
                    user_id: self.participant.user_id.clone(),
                    test_code: self.participant.test_code.clone(),
                })
            }
            Err(e) => {
                phase.finish(SessionPhase::Active);
                tracing::warn!("Submission for {} failed: {}", self.participant.user_id, e);
                self.last_error = Some(e.to_string());
                Err(SessionError::SubmitFailed(e))
            }
        }
    }

    /// The payload [`Self::submit`] sends, stamped with `end_time`.
    pub fn build_submission(&self, end_time: chrono::DateTime<chrono::Utc>) -> SubmitTestRequest {
        let answers = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, answer)| SubmittedAnswer {
                question_id: question.id.clone(),
                answer: answer.option.map(|o| o.to_string()).unwrap_or_default(),
                confidence: answer.confidence.map(|c| c.to_string()).unwrap_or_default(),
                correct_answer: question.correct_answer.clone(),
                subtopic_id: question.subtopic_id.clone(),
                competence: question.competence.clone(),
            })
            .collect();

        SubmitTestRequest {
            user_id: self.participant.user_id.clone(),
            test_code: self.participant.test_code.clone(),
            answers,
            end_time: Some(end_time.to_rfc3339()),
        }
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::Submitting => Err(SessionError::SubmissionInProgress),
            SessionPhase::Submitted => Err(SessionError::SessionClosed),
        }
    }
}

/// Holds a session in [`SessionPhase::Submitting`] until finished; falls back
/// to [`SessionPhase::Active`] when dropped unfinished.
struct SubmittingPhase<'a> {
    phase: &'a mut SessionPhase,
    finished: bool,
}

impl<'a> SubmittingPhase<'a> {
    fn enter(phase: &'a mut SessionPhase) -> Self {
        *phase = SessionPhase::Submitting;
        Self {
            phase,
            finished: false,
        }
    }

    fn finish(mut self, next: SessionPhase) {
        *self.phase = next;
        self.finished = true;
    }
}

impl Drop for SubmittingPhase<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.phase = SessionPhase::Active;
        }
    }
}
