use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source archive acquisition events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AcquisitionEvent {
    /// Fetch of the source archive started
    FetchStarted { url: String },

    /// Fetch finished; the archive is on disk but not yet verified
    FetchCompleted { url: String, bytes: u64 },

    /// Archive digest matched the recipe digest
    ChecksumVerified { path: PathBuf, digest: String },
}
