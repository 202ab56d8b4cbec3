//! Per-user configuration bootstrap

use crate::staging::theme_files;
use nutforge_errors::Error;
use nutforge_events::{AppEvent, BootstrapEvent, EventEmitter, EventSender};
use nutforge_types::ResourceSpec;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// What the bootstrapper did
#[derive(Debug, Clone)]
pub struct BootstrapSummary {
    pub user_root: PathBuf,
    pub seeded: usize,
}

/// Materialize the per-user configuration tree and seed default themes
///
/// Idempotent and safe to run on every install or upgrade. Themes are
/// seeded only into an empty user `themes/` directory; user-authored or
/// user-modified files are never touched. Failures here are reported as
/// warnings and never fail the install: the binary is usable without
/// themes.
pub async fn bootstrap_user_config(
    prefix: &Path,
    user_root: &Path,
    resources: &ResourceSpec,
    display_name: &str,
    tx: &EventSender,
) -> BootstrapSummary {
    tx.emit(AppEvent::Bootstrap(BootstrapEvent::Started {
        user_root: user_root.to_path_buf(),
    }));

    let seeded = match bootstrap_inner(prefix, user_root, resources, tx).await {
        Ok(count) => count,
        Err(e) => {
            tx.emit_warning_with_context(
                "user configuration bootstrap incomplete".to_string(),
                e.to_string(),
            );
            0
        }
    };

    tx.emit(AppEvent::Bootstrap(BootstrapEvent::Notice {
        message: format!("{display_name} has been installed!"),
    }));
    tx.emit_warning(format!(
        "Set an API key before AI-assisted features will work: {display_name} set-api-key YOUR_API_KEY"
    ));

    tx.emit(AppEvent::Bootstrap(BootstrapEvent::Completed {
        user_root: user_root.to_path_buf(),
    }));

    BootstrapSummary {
        user_root: user_root.to_path_buf(),
        seeded,
    }
}

async fn bootstrap_inner(
    prefix: &Path,
    user_root: &Path,
    resources: &ResourceSpec,
    tx: &EventSender,
) -> Result<usize, Error> {
    let user_themes = user_root.join("themes");
    let user_packages = user_root.join("packages");

    // Guarded creates, not exists-then-create: already existing is fine
    fs::create_dir_all(&user_themes).await?;
    fs::create_dir_all(&user_packages).await?;

    seed_themes(prefix, user_root, &user_themes, resources, tx).await
}

/// Seed default themes into the user themes directory, exactly once
///
/// The copy goes into a unique staging directory that is then renamed over
/// the target. rename(2) replaces an empty directory and fails with
/// `ENOTEMPTY` otherwise, so "already seeded" is detected by the rename
/// itself rather than by a racy emptiness pre-check.
async fn seed_themes(
    prefix: &Path,
    user_root: &Path,
    user_themes: &Path,
    resources: &ResourceSpec,
    tx: &EventSender,
) -> Result<usize, Error> {
    let defaults = theme_files(
        &prefix.join(&resources.theme_dir),
        &resources.theme_extension,
    )
    .await?;

    let staging = user_root.join(format!(".themes.seed-{}", Uuid::new_v4()));
    fs::create_dir_all(&staging).await?;

    let mut copied = 0usize;
    for theme in &defaults {
        let Some(file_name) = theme.file_name() else {
            continue;
        };
        if let Err(e) = fs::copy(theme, staging.join(file_name)).await {
            let _ = fs::remove_dir_all(&staging).await;
            return Err(e.into());
        }
        copied += 1;
    }

    match fs::rename(&staging, user_themes).await {
        Ok(()) => {
            tx.emit(AppEvent::Bootstrap(BootstrapEvent::ThemesSeeded {
                count: copied,
            }));
            Ok(copied)
        }
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::DirectoryNotEmpty | std::io::ErrorKind::AlreadyExists
            ) =>
        {
            let _ = fs::remove_dir_all(&staging).await;
            tx.emit(AppEvent::Bootstrap(BootstrapEvent::SeedSkipped {
                reason: "user themes directory is not empty".to_string(),
            }));
            Ok(0)
        }
        Err(e) => {
            let _ = fs::remove_dir_all(&staging).await;
            Err(e.into())
        }
    }
}
