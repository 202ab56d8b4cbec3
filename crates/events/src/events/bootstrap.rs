use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Post-install bootstrap events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BootstrapEvent {
    /// User configuration bootstrap started
    Started { user_root: PathBuf },

    /// Default themes were seeded into the user themes directory
    ThemesSeeded { count: usize },

    /// Seeding was skipped because the user themes directory is not empty
    SeedSkipped { reason: String },

    /// Advisory notice for the user (printed verbatim by the CLI)
    Notice { message: String },

    /// Bootstrap finished; failures degrade to warnings, never errors
    Completed { user_root: PathBuf },
}
