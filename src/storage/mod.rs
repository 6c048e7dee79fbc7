// src/storage/mod.rs

//! File-backed stores: question packages, participants and submissions.

pub mod collection;
pub mod questions;
pub mod submissions;
pub mod users;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::answer::ParseAnswerError;

pub use collection::JsonCollection;
pub use questions::QuestionStore;
pub use submissions::SubmissionStore;
pub use users::UserRegistry;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Submission contains no answers")]
    EmptySubmission,

    #[error("Invalid answer for question {question_id}: {source}")]
    InvalidAnswer {
        question_id: String,
        #[source]
        source: ParseAnswerError,
    },

    #[error("Question package {} holds no question table", .path.display())]
    InvalidPackage { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt JSON in {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            source,
        }
    }
}
