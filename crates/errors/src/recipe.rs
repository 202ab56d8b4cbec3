//! Recipe loading and validation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RecipeError {
    #[error("failed to read recipe {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("invalid recipe: {message}")]
    ParseFailed { message: String },

    #[error("invalid version: {message}")]
    InvalidVersion { message: String },

    #[error("invalid checksum: {message}")]
    InvalidChecksum { message: String },

    #[error("recipe field {field} must not be empty")]
    EmptyField { field: String },
}

impl UserFacingError for RecipeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ReadFailed { .. } => "recipe.read_failed",
            Self::ParseFailed { .. } => "recipe.parse_failed",
            Self::InvalidVersion { .. } => "recipe.invalid_version",
            Self::InvalidChecksum { .. } => "recipe.invalid_checksum",
            Self::EmptyField { .. } => "recipe.empty_field",
        };
        Some(code)
    }
}
