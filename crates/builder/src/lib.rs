#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Native build execution for nutforge
//!
//! Unpacks the verified source archive, synthesizes compiler and linker
//! flags from the resolved dependencies (appending to whatever the caller's
//! environment already carries), and invokes the recipe's build tool. The
//! build is synchronous from the pipeline's point of view: one invocation,
//! pass or fail, no retries.

mod environment;
mod source;

pub use environment::{BuildCommandResult, BuildEnvironment};
pub use source::extract_archive;

use nutforge_errors::{BuildError, Error};
use nutforge_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use nutforge_resolver::Resolution;
use nutforge_types::BuildSpec;
use std::path::{Path, PathBuf};

/// Run the recipe's build in `source_dir` and return the artifact path
///
/// # Errors
///
/// Returns `BuildError::Failed` with the tool's captured output on a
/// non-zero exit, and `BuildError::ArtifactMissing` if the build succeeded
/// but did not produce the declared artifact.
pub async fn run_build(
    spec: &BuildSpec,
    resolution: &Resolution,
    source_dir: &Path,
    tx: &EventSender,
) -> Result<PathBuf, Error> {
    let mut env = BuildEnvironment::new(source_dir.to_path_buf(), tx.clone());
    env.inject_dependencies(resolution);

    let args: Vec<&str> = spec.args.iter().map(String::as_str).collect();
    let result = env.execute_command(&spec.tool, &args).await?;

    if !result.success {
        return Err(BuildError::Failed {
            message: format!(
                "{} exited with code {:?}:\n{}",
                spec.tool, result.exit_code, result.stderr
            ),
        }
        .into());
    }

    let artifact = source_dir.join(&spec.artifact);
    if !tokio::fs::try_exists(&artifact).await.unwrap_or(false) {
        return Err(BuildError::ArtifactMissing {
            path: artifact.display().to_string(),
        }
        .into());
    }

    tx.emit(AppEvent::Build(BuildEvent::Completed {
        artifact: artifact.clone(),
    }));

    Ok(artifact)
}
