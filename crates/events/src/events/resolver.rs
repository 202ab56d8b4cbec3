use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dependency resolution events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResolverEvent {
    /// Resolution started for a dependency set
    Started { count: usize },

    /// A library dependency was located
    LibraryResolved {
        name: String,
        include_dir: PathBuf,
        lib_dir: PathBuf,
    },

    /// A tool dependency was located
    ToolResolved { name: String, path: PathBuf },

    /// All dependencies resolved
    Completed { resolved: usize },
}
