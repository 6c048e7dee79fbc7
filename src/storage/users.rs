// src/storage/users.rs

use std::path::Path;

use uuid::Uuid;
use validator::Validate;

use super::{JsonCollection, StoreError};
use crate::models::user::{CreateUserRequest, User};

pub const USERS_FILE: &str = "users.json";

/// Append-only registry of participants.
///
/// There is no account model: registering the same name or email twice
/// yields two records with distinct identifiers.
pub struct UserRegistry {
    users: JsonCollection<User>,
}

impl UserRegistry {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            users: JsonCollection::new(data_dir.join(USERS_FILE)),
        }
    }

    /// Validates and stores a new participant, returning it with its generated id.
    ///
    /// Fields are validated after trimming and stored as plain text.
    pub async fn register(&self, request: CreateUserRequest) -> Result<User, StoreError> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let user = User {
            user_id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            test_code: request.test_code,
            created_at: Some(chrono::Utc::now()),
        };

        self.users.append(vec![user.clone()]).await?;
        tracing::info!("Registered participant {} for test {}", user.user_id, user.test_code);

        Ok(user)
    }
}
