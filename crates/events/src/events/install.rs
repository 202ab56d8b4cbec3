use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Install staging events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    /// Staging into the install prefix started
    StagingStarted { prefix: PathBuf },

    /// A file was copied into the prefix
    FileStaged { path: PathBuf },

    /// Staging finished
    StagingCompleted { prefix: PathBuf, files: usize },
}
