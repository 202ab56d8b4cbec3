//! Build execution error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum BuildError {
    #[error("build failed: {message}")]
    Failed { message: String },

    #[error("build tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("build artifact missing: {path}")]
    ArtifactMissing { path: String },

    #[error("source tree not found under {path}")]
    SourceTreeMissing { path: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Failed { .. } => {
                Some("Inspect the captured build output above for the first compiler error.")
            }
            Self::ToolNotFound { .. } => Some("Install the build tool or add it to PATH."),
            Self::ExtractionFailed { .. } => {
                Some("The source archive may be corrupt; re-fetch it.")
            }
            Self::ArtifactMissing { .. } | Self::SourceTreeMissing { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Failed { .. } => "build.failed",
            Self::ToolNotFound { .. } => "build.tool_not_found",
            Self::ExtractionFailed { .. } => "build.extraction_failed",
            Self::ArtifactMissing { .. } => "build.artifact_missing",
            Self::SourceTreeMissing { .. } => "build.source_tree_missing",
        };
        Some(code)
    }
}
