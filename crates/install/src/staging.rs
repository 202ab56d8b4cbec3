//! Install prefix staging

use nutforge_errors::{Error, InstallError};
use nutforge_events::{AppEvent, EventEmitter, EventSender, InstallEvent};
use nutforge_types::Recipe;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of staging one package into its prefix
#[derive(Debug, Clone)]
pub struct StagedInstall {
    pub prefix: PathBuf,
    pub binary: PathBuf,
    pub staged_files: Vec<PathBuf>,
}

/// Stage the build artifact and bundled resources into the install prefix
///
/// Directory creation is idempotent; staging twice with identical inputs
/// leaves the prefix in the same final state. Copy failures are fatal and
/// abort the remaining steps without cleaning up what was already copied.
///
/// # Errors
///
/// Returns `InstallError::FilesystemError` on any directory creation or
/// file copy failure.
pub async fn stage_install(
    prefix: &Path,
    artifact: &Path,
    source_dir: &Path,
    recipe: &Recipe,
    tx: &EventSender,
) -> Result<StagedInstall, Error> {
    tx.emit(AppEvent::Install(InstallEvent::StagingStarted {
        prefix: prefix.to_path_buf(),
    }));

    let bin_dir = prefix.join("bin");
    let doc_dir = prefix.join("doc");
    let themes_dir = prefix.join("themes");
    let packages_dir = prefix.join("packages");

    for dir in [&bin_dir, &doc_dir, &themes_dir, &packages_dir] {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| InstallError::filesystem("create_prefix_dir", dir, &e))?;
    }

    let mut staged_files = Vec::new();

    // 1. the binary
    let binary = bin_dir.join(&recipe.package.name);
    copy_file(artifact, &binary, "stage_binary", tx).await?;
    set_executable(&binary).await?;
    staged_files.push(binary.clone());

    // 2. documentation
    for doc in &recipe.resources.docs {
        let from = source_dir.join(doc);
        let to = doc_dir.join(doc);
        copy_file(&from, &to, "stage_doc", tx).await?;
        staged_files.push(to);
    }

    // 3. bundled themes
    let theme_source = source_dir.join(&recipe.resources.theme_dir);
    for theme in
        theme_files(&theme_source, &recipe.resources.theme_extension).await?
    {
        let file_name = theme.file_name().map(std::ffi::OsStr::to_os_string);
        let Some(file_name) = file_name else { continue };
        let to = themes_dir.join(file_name);
        copy_file(&theme, &to, "stage_theme", tx).await?;
        staged_files.push(to);
    }

    tx.emit(AppEvent::Install(InstallEvent::StagingCompleted {
        prefix: prefix.to_path_buf(),
        files: staged_files.len(),
    }));

    Ok(StagedInstall {
        prefix: prefix.to_path_buf(),
        binary,
        staged_files,
    })
}

/// List files with the given extension in `dir`, sorted by name
///
/// A missing directory is an empty theme set, matching an empty glob.
pub(crate) async fn theme_files(
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, Error> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(Vec::new());
    }

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| InstallError::filesystem("read_theme_dir", dir, &e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| InstallError::filesystem("read_theme_dir", dir, &e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

async fn copy_file(
    from: &Path,
    to: &Path,
    operation: &str,
    tx: &EventSender,
) -> Result<(), Error> {
    fs::copy(from, to)
        .await
        .map_err(|e| InstallError::filesystem(operation, from, &e))?;
    tx.emit(AppEvent::Install(InstallEvent::FileStaged {
        path: to.to_path_buf(),
    }));
    Ok(())
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    let permissions = std::fs::Permissions::from_mode(0o755);
    fs::set_permissions(path, permissions)
        .await
        .map_err(|e| InstallError::filesystem("set_binary_permissions", path, &e))?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) -> Result<(), Error> {
    Ok(())
}
