// src/handlers/submissions.rs

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    handlers::questions::require_test_code,
    models::result::{SubmitTestRequest, TestResult},
    storage::SubmissionStore,
};

/// Accepts a finished attempt, scores it and stores answers plus result.
///
/// Responds `{"success": true}`, or `{"success": false, "error": ...}` with
/// 400 for malformed/empty submissions and 500 for storage failures. The body
/// is read raw so that invalid JSON gets the same envelope.
pub async fn submit_test(State(store): State<Arc<SubmissionStore>>, body: Bytes) -> Response {
    match store_submission(&store, &body).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            let status = e.status();
            let body = Json(json!({
                "success": false,
                "error": e.public_message(),
            }));
            (status, body).into_response()
        }
    }
}

async fn store_submission(store: &SubmissionStore, body: &[u8]) -> Result<TestResult, AppError> {
    let request: SubmitTestRequest = serde_json::from_slice(body)?;
    Ok(store.append_submission(request).await?)
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(rename = "testCode")]
    pub test_code: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Retrieves the most recent result for a participant and test code.
pub async fn get_result(
    State(store): State<Arc<SubmissionStore>>,
    Query(query): Query<ResultQuery>,
) -> Result<impl IntoResponse, AppError> {
    let missing = || AppError::BadRequest("Test code and user ID are required".to_string());

    let test_code = require_test_code(query.test_code).map_err(|_| missing())?;
    let user_id = query
        .user_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(missing)?;

    let result = store.fetch_result(&user_id, &test_code).await?;

    Ok(Json(result))
}
