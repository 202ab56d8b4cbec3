//! Post-install verification error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum VerifyError {
    #[error("smoke test failed for {binary}: exit code {exit_code:?}, expected output containing {expected:?}")]
    SmokeTestFailed {
        binary: String,
        exit_code: Option<i32>,
        expected: String,
        stdout: String,
    },

    #[error("installed binary missing: {path}")]
    BinaryMissing { path: String },

    #[error("failed to launch {binary}: {message}")]
    LaunchFailed { binary: String, message: String },
}

impl UserFacingError for VerifyError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SmokeTestFailed { .. } => {
                Some("The package built but fails verification; the binary remains installed.")
            }
            Self::BinaryMissing { .. } => Some("Run install before test."),
            Self::LaunchFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SmokeTestFailed { .. } => "verify.smoke_test_failed",
            Self::BinaryMissing { .. } => "verify.binary_missing",
            Self::LaunchFailed { .. } => "verify.launch_failed",
        };
        Some(code)
    }
}
