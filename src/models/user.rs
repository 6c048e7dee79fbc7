// src/models/user.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::html::has_visible_text;

/// Represents one row of `users.json`.
/// Participants have no accounts; every registration creates a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "testCode")]
    pub test_code: String,

    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for registering a participant (welcome screen).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Name length must be between 1 and 100 characters."
        ),
        custom(function = validate_display_name)
    )]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Email address is not valid."))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(max = 32, message = "Phone number is too long."))]
    pub phone: Option<String>,

    #[serde(rename = "testCode")]
    #[validate(length(
        min = 1,
        max = 64,
        message = "Test code length must be between 1 and 64 characters."
    ))]
    pub test_code: String,
}

/// Rejects names made only of markup, e.g. `<b></b>`.
fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if has_visible_text(name) {
        return Ok(());
    }
    let mut err = ValidationError::new("name_has_no_text");
    err.message = Some("Name must contain visible text.".into());
    Err(err)
}

impl CreateUserRequest {
    pub fn new(name: impl Into<String>, test_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            test_code: test_code.into(),
        }
    }

    /// Browser forms post optional fields as empty strings.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.test_code = self.test_code.trim().to_string();
        self.email = self.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        self.phone = self.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        self
    }
}
