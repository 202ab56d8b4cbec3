use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smoke test events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerifyEvent {
    /// Smoke test started for an installed binary
    SmokeTestStarted { binary: PathBuf },

    /// The binary ran, exited 0, and identified itself
    SmokeTestPassed { binary: PathBuf },
}
