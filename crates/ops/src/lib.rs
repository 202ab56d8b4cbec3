#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for nutforge
//!
//! This crate is the layer between the CLI and the specialized crates: it
//! owns the phase ordering (resolve, acquire, build, stage, bootstrap) and
//! the post-install smoke test, and renders results as serializable
//! reports.

mod context;
mod install;
mod recipe;
mod types;
mod verify;

pub use context::{OpsContextBuilder, OpsCtx};
pub use install::install;
pub use recipe::load_recipe;
pub use types::{InstallReport, VerifyReport};
pub use verify::verify;

use nutforge_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Installation report
    InstallReport(InstallReport),
    /// Verification report
    VerifyReport(VerifyReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
