//! Post-install smoke test

use crate::{OpsCtx, VerifyReport};
use nutforge_errors::{Error, VerifyError};
use nutforge_events::{AppEvent, EventEmitter, VerifyEvent};
use nutforge_types::Recipe;
use tokio::fs;

/// Smoke-test the installed binary
///
/// Runs `<prefix>/bin/<name> --help` and requires exit code 0 with the
/// package's display name somewhere in stdout. This distinguishes "built
/// but broken" from "failed to build": the binary stays installed either
/// way.
///
/// # Errors
///
/// Returns `VerifyError::BinaryMissing` when nothing is installed and
/// `VerifyError::SmokeTestFailed` on a wrong exit code or unexpected
/// output.
pub async fn verify(ctx: &OpsCtx, recipe: &Recipe) -> Result<VerifyReport, Error> {
    let package = &recipe.package;
    let prefix = ctx
        .config
        .prefix_path(&package.name, &package.version.to_string());
    let binary = prefix.join("bin").join(&package.name);

    if !fs::try_exists(&binary).await.unwrap_or(false) {
        return Err(VerifyError::BinaryMissing {
            path: binary.display().to_string(),
        }
        .into());
    }

    ctx.tx.emit(AppEvent::Verify(VerifyEvent::SmokeTestStarted {
        binary: binary.clone(),
    }));

    let output = tokio::process::Command::new(&binary)
        .arg("--help")
        .output()
        .await
        .map_err(|e| VerifyError::LaunchFailed {
            binary: binary.display().to_string(),
            message: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let exit_code = output.status.code();

    if exit_code != Some(0) || !stdout.contains(&package.display_name) {
        return Err(VerifyError::SmokeTestFailed {
            binary: binary.display().to_string(),
            exit_code,
            expected: package.display_name.clone(),
            stdout,
        }
        .into());
    }

    ctx.tx.emit(AppEvent::Verify(VerifyEvent::SmokeTestPassed {
        binary: binary.clone(),
    }));

    Ok(VerifyReport {
        binary,
        exit_code: 0,
        output: stdout,
    })
}
