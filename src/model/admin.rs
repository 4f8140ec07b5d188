use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[validate(length(min = 3, max = 50), custom(function = "letters_only"))]
    pub name: String,
    #[validate(length(min = 3, max = 50), custom(function = "letters_only"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 30), custom(function = "letters_and_digits"))]
    pub password: String,
}

impl Entity for Admin {
    const COLLECTION: &'static str = "admins";
}

/// Partial update payload; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 50), custom(function = "letters_only"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 50), custom(function = "letters_only"))]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, max = 30), custom(function = "letters_and_digits"))]
    pub password: Option<String>,
}

fn letters_only(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_alphabetic() || c == ' ') {
        Ok(())
    } else {
        Err(ValidationError::new("letters_only"))
    }
}

fn letters_and_digits(value: &str) -> Result<(), ValidationError> {
    let alphanumeric = value.chars().all(|c| c.is_ascii_alphanumeric());
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if alphanumeric && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("letters_and_digits"))
    }
}
