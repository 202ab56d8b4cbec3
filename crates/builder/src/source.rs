//! Source archive extraction

use flate2::read::GzDecoder;
use nutforge_errors::{BuildError, Error};
use nutforge_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Unpack a verified `.tar.gz` archive and return the source tree root
///
/// Release tarballs contain a single top-level directory; when that is the
/// case the returned path points inside it, otherwise `dest` itself is the
/// source root.
///
/// # Errors
///
/// Returns `BuildError::ExtractionFailed` if the archive cannot be read or
/// unpacked, and `BuildError::SourceTreeMissing` if nothing was extracted.
pub async fn extract_archive(
    archive: &Path,
    dest: &Path,
    tx: &EventSender,
) -> Result<PathBuf, Error> {
    fs::create_dir_all(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    let archive_path = archive.to_path_buf();
    let dest_path = dest.to_path_buf();

    // tar + flate2 are synchronous; keep them off the async executor
    tokio::task::spawn_blocking(move || -> Result<(), Error> {
        let file = std::fs::File::open(&archive_path)
            .map_err(|e| Error::io_with_path(&e, &archive_path))?;
        let decoder = GzDecoder::new(file);
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(&dest_path)
            .map_err(|e| {
                BuildError::ExtractionFailed {
                    message: e.to_string(),
                }
                .into()
            })
    })
    .await
    .map_err(|e| {
        Error::from(BuildError::ExtractionFailed {
            message: format!("extraction task failed: {e}"),
        })
    })??;

    let source_dir = strip_single_top_level(dest).await?;

    tx.emit(AppEvent::Build(BuildEvent::SourceExtracted {
        source_dir: source_dir.clone(),
    }));

    Ok(source_dir)
}

/// Descend into the archive's single top-level directory, if there is one
async fn strip_single_top_level(dest: &Path) -> Result<PathBuf, Error> {
    let mut entries = fs::read_dir(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    let mut dirs = Vec::new();
    let mut has_files = false;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;
        if file_type.is_dir() {
            dirs.push(entry.path());
        } else {
            has_files = true;
        }
    }

    match (dirs.len(), has_files) {
        (0, false) => Err(BuildError::SourceTreeMissing {
            path: dest.display().to_string(),
        }
        .into()),
        (1, false) => Ok(dirs.remove(0)),
        _ => Ok(dest.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    /// Build a small `.tar.gz` with one top-level directory
    fn make_archive(dest: &Path, top_dir: &str, files: &[(&str, &str)]) {
        let file = std::fs::File::create(dest).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut tar = tar::Builder::new(encoder);

        for (name, content) in files {
            let path = format!("{top_dir}/{name}");
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append_data(&mut header, &path, content.as_bytes())
                .unwrap();
        }

        tar.into_inner().unwrap().finish().unwrap();
    }

    #[tokio::test]
    async fn test_extract_strips_top_level_dir() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("src.tar.gz");
        make_archive(
            &archive,
            "nutshell-0.0.4",
            &[("Makefile", "all:\n"), ("README.md", "# Nutshell\n")],
        );

        let dest = dir.path().join("work");
        let (tx, _rx) = nutforge_events::channel();
        let source_dir = extract_archive(&archive, &dest, &tx).await.unwrap();

        assert_eq!(source_dir, dest.join("nutshell-0.0.4"));
        assert!(source_dir.join("Makefile").exists());
        assert!(source_dir.join("README.md").exists());
    }

    #[tokio::test]
    async fn test_extract_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("src.tar.gz");
        tokio::fs::write(&archive, b"this is not a tarball")
            .await
            .unwrap();

        let dest = dir.path().join("work");
        let (tx, _rx) = nutforge_events::channel();
        let err = extract_archive(&archive, &dest, &tx).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::ExtractionFailed { .. })
        ));
    }
}
