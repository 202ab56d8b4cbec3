use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Native build events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// Source archive unpacked into the work directory
    SourceExtracted { source_dir: PathBuf },

    /// Build tool invocation started
    CommandStarted {
        command: String,
        working_dir: PathBuf,
    },

    /// Build tool invocation finished
    CommandCompleted { command: String, exit_code: i32 },

    /// The build artifact exists and is ready for staging
    Completed { artifact: PathBuf },
}
