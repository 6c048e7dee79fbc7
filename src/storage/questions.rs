// src/storage/questions.rs

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

use super::StoreError;
use crate::models::question::{PackageFile, Question};

/// Read-only access to the packaged question sets, one `<CODE>.json` per test.
///
/// Test codes match file names case-insensitively. Parsed packages are cached
/// by file name for the lifetime of the store.
pub struct QuestionStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Vec<Question>>>>,
}

impl QuestionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a package exists for `test_code`.
    pub async fn validate_test_code(&self, test_code: &str) -> Result<bool, StoreError> {
        Ok(self.find_package(test_code).await?.is_some())
    }

    /// The ordered question list for `test_code`.
    pub async fn get_questions(&self, test_code: &str) -> Result<Arc<Vec<Question>>, StoreError> {
        let file_name = self
            .find_package(test_code)
            .await?
            .ok_or_else(|| StoreError::NotFound("Question package not found".to_string()))?;

        if let Some(questions) = self.cache.read().await.get(&file_name) {
            return Ok(Arc::clone(questions));
        }

        let path = self.dir.join(&file_name);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        let package: PackageFile =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(&path, e))?;
        let questions = Arc::new(
            package
                .into_questions()
                .ok_or(StoreError::InvalidPackage { path: path.clone() })?,
        );

        tracing::debug!("Loaded {} questions from {}", questions.len(), path.display());

        self.cache
            .write()
            .await
            .insert(file_name, Arc::clone(&questions));

        Ok(questions)
    }

    /// Scans the package directory for `<test_code>.json`, ignoring case.
    async fn find_package(&self, test_code: &str) -> Result<Option<String>, StoreError> {
        let wanted = format!("{}.json", test_code.trim().to_lowercase());

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.to_lowercase() == wanted {
                return Ok(Some(name));
            }
        }

        Ok(None)
    }
}
