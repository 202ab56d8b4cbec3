//! Dependency resolution error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ResolveError {
    #[error("missing dependency: {name} ({scope})")]
    DependencyMissing { name: String, scope: String },

    #[error("no dependency search roots configured")]
    NoSearchRoots,

    #[error("build tool not found: {name}")]
    ToolMissing { name: String },
}

impl UserFacingError for ResolveError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DependencyMissing { .. } => {
                Some("Install the missing library so its include/ and lib/ directories exist under a search root.")
            }
            Self::ToolMissing { .. } => {
                Some("Install the missing tool or add its location to PATH.")
            }
            Self::NoSearchRoots => {
                Some("Configure at least one dependency search root in [paths].")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DependencyMissing { .. } => "resolve.dependency_missing",
            Self::NoSearchRoots => "resolve.no_search_roots",
            Self::ToolMissing { .. } => "resolve.tool_missing",
        };
        Some(code)
    }
}
