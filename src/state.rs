// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    storage::{QuestionStore, SubmissionStore, UserRegistry},
};

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<QuestionStore>,
    pub users: Arc<UserRegistry>,
    pub submissions: Arc<SubmissionStore>,
    pub config: Config,
}

impl AppState {
    /// Opens every store at the locations named by `config`.
    pub fn new(config: Config) -> Self {
        Self {
            questions: Arc::new(QuestionStore::new(&config.question_packages_dir)),
            users: Arc::new(UserRegistry::new(&config.data_dir)),
            submissions: Arc::new(SubmissionStore::new(&config.data_dir)),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuestionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for Arc<UserRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Arc<SubmissionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.submissions.clone()
    }
}
