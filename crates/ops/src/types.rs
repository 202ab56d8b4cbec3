//! Report types for operation results

use serde::Serialize;
use std::path::PathBuf;

/// Report of a completed installation
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub package: String,
    pub version: String,
    pub prefix: PathBuf,
    pub binary: PathBuf,
    pub staged_files: usize,
    pub themes_seeded: usize,
    pub user_root: PathBuf,
}

/// Report of a passed smoke test
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub binary: PathBuf,
    pub exit_code: i32,
    pub output: String,
}
