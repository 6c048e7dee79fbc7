// src/handlers/questions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, storage::QuestionStore};

#[derive(Debug, Deserialize)]
pub struct TestCodeQuery {
    #[serde(rename = "testCode")]
    pub test_code: Option<String>,
}

/// Extracts a non-blank test code or fails with 400.
pub(crate) fn require_test_code(test_code: Option<String>) -> Result<String, AppError> {
    test_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Test code is required".to_string()))
}

/// Returns the packaged question list for a test code.
///
/// Lookup is case-insensitive on the package file name.
pub async fn get_questions(
    State(store): State<Arc<QuestionStore>>,
    Query(query): Query<TestCodeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let test_code = require_test_code(query.test_code)?;

    let questions = store.get_questions(&test_code).await.map_err(|e| {
        tracing::warn!("Failed to load questions for {}: {}", test_code, e);
        AppError::from(e)
    })?;

    Ok(Json(questions.as_ref().clone()))
}

/// Checks that a package exists before a participant registers for it.
pub async fn validate_test_code(
    State(store): State<Arc<QuestionStore>>,
    Query(query): Query<TestCodeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let test_code = require_test_code(query.test_code)?;

    if !store.validate_test_code(&test_code).await? {
        return Err(AppError::NotFound("Test code not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}
