// src/session/backend.rs

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    models::{
        question::Question,
        result::{SubmitTestRequest, TestResult},
        user::{CreateUserRequest, User},
    },
    state::AppState,
    storage::{QuestionStore, StoreError, SubmissionStore, UserRegistry},
};

/// Errors a session sees when talking to its backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => BackendError::NotFound(msg),
            e @ (StoreError::Validation(_)
            | StoreError::EmptySubmission
            | StoreError::InvalidAnswer { .. }) => BackendError::Rejected(e.to_string()),
            e => BackendError::Storage(e.to_string()),
        }
    }
}

/// Everything a test session and the result view need from the server side.
#[async_trait]
pub trait TestBackend: Send + Sync {
    async fn validate_test_code(&self, test_code: &str) -> Result<bool, BackendError>;

    async fn fetch_questions(&self, test_code: &str) -> Result<Vec<Question>, BackendError>;

    async fn register(&self, request: CreateUserRequest) -> Result<User, BackendError>;

    async fn submit(&self, request: SubmitTestRequest) -> Result<(), BackendError>;

    async fn fetch_result(&self, user_id: &str, test_code: &str)
    -> Result<TestResult, BackendError>;
}

/// Talks to the stores directly, in-process.
#[derive(Clone)]
pub struct LocalBackend {
    questions: Arc<QuestionStore>,
    users: Arc<UserRegistry>,
    submissions: Arc<SubmissionStore>,
}

impl LocalBackend {
    pub fn new(state: &AppState) -> Self {
        Self {
            questions: state.questions.clone(),
            users: state.users.clone(),
            submissions: state.submissions.clone(),
        }
    }
}

#[async_trait]
impl TestBackend for LocalBackend {
    async fn validate_test_code(&self, test_code: &str) -> Result<bool, BackendError> {
        Ok(self.questions.validate_test_code(test_code).await?)
    }

    async fn fetch_questions(&self, test_code: &str) -> Result<Vec<Question>, BackendError> {
        let questions = self.questions.get_questions(test_code).await?;
        Ok(questions.as_ref().clone())
    }

    async fn register(&self, request: CreateUserRequest) -> Result<User, BackendError> {
        Ok(self.users.register(request).await?)
    }

    async fn submit(&self, request: SubmitTestRequest) -> Result<(), BackendError> {
        self.submissions.append_submission(request).await?;
        Ok(())
    }

    async fn fetch_result(
        &self,
        user_id: &str,
        test_code: &str,
    ) -> Result<TestResult, BackendError> {
        Ok(self.submissions.fetch_result(user_id, test_code).await?)
    }
}

#[async_trait]
impl<B: TestBackend + ?Sized> TestBackend for Arc<B> {
    async fn validate_test_code(&self, test_code: &str) -> Result<bool, BackendError> {
        (**self).validate_test_code(test_code).await
    }

    async fn fetch_questions(&self, test_code: &str) -> Result<Vec<Question>, BackendError> {
        (**self).fetch_questions(test_code).await
    }

    async fn register(&self, request: CreateUserRequest) -> Result<User, BackendError> {
        (**self).register(request).await
    }

    async fn submit(&self, request: SubmitTestRequest) -> Result<(), BackendError> {
        (**self).submit(request).await
    }

    async fn fetch_result(
        &self,
        user_id: &str,
        test_code: &str,
    ) -> Result<TestResult, BackendError> {
        (**self).fetch_result(user_id, test_code).await
    }
}
