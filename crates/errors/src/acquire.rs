//! Source archive acquisition error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AcquireError {
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported protocol: {protocol}")]
    UnsupportedProtocol { protocol: String },

    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("download incomplete: {message}")]
    Incomplete { message: String },

    #[error("local source not found: {path}")]
    LocalSourceNotFound { path: String },
}

impl UserFacingError for AcquireError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ChecksumMismatch { .. } => {
                Some("The downloaded archive does not match the recipe digest; refusing to build it.")
            }
            Self::HttpError { .. } | Self::Incomplete { .. } => {
                Some("Check network access to the source URL and try again.")
            }
            Self::InvalidUrl(_) | Self::UnsupportedProtocol { .. } => {
                Some("The recipe source URL must use http, https, or file.")
            }
            Self::LocalSourceNotFound { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError { .. } | Self::Incomplete { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ChecksumMismatch { .. } => "acquire.checksum_mismatch",
            Self::InvalidUrl(_) => "acquire.invalid_url",
            Self::UnsupportedProtocol { .. } => "acquire.unsupported_protocol",
            Self::HttpError { .. } => "acquire.http_error",
            Self::Incomplete { .. } => "acquire.incomplete",
            Self::LocalSourceNotFound { .. } => "acquire.local_source_not_found",
        };
        Some(code)
    }
}
