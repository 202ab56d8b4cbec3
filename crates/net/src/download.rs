//! Source archive fetch with inline checksum verification

use crate::NetClient;
use futures::StreamExt;
use nutforge_errors::{AcquireError, Error};
use nutforge_events::{AcquisitionEvent, AppEvent, EventEmitter, EventSender};
use nutforge_hash::{Checksum, Hasher};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Validate the source URL and check for supported protocols
fn validate_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| AcquireError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        scheme => Err(AcquireError::UnsupportedProtocol {
            protocol: scheme.to_string(),
        }
        .into()),
    }
}

/// Fetch the source archive into `dest` and verify it against `expected`
///
/// The archive is hashed while it is written. On a digest mismatch the
/// partial file is removed before the error is returned, so nothing
/// downstream can pick up an unverified archive.
///
/// # Errors
///
/// Returns `AcquireError` on an invalid URL, a transport failure, or a
/// checksum mismatch.
pub async fn fetch_source(
    net: &NetClient,
    url: &str,
    dest: &Path,
    expected: &Checksum,
    tx: &EventSender,
) -> Result<PathBuf, Error> {
    let parsed = validate_url(url)?;

    tx.emit(AppEvent::Acquisition(AcquisitionEvent::FetchStarted {
        url: url.to_string(),
    }));

    let (checksum, bytes) = match parsed.scheme() {
        "file" => copy_local(&parsed, dest).await?,
        _ => download_http(net, &parsed, dest).await?,
    };

    tx.emit(AppEvent::Acquisition(AcquisitionEvent::FetchCompleted {
        url: url.to_string(),
        bytes,
    }));

    if checksum != *expected {
        // Refuse to leave an unverified archive behind
        let _ = fs::remove_file(dest).await;
        return Err(AcquireError::ChecksumMismatch {
            url: url.to_string(),
            expected: expected.to_hex(),
            actual: checksum.to_hex(),
        }
        .into());
    }

    tx.emit(AppEvent::Acquisition(AcquisitionEvent::ChecksumVerified {
        path: dest.to_path_buf(),
        digest: checksum.to_hex(),
    }));

    Ok(dest.to_path_buf())
}

/// Stream an HTTP(S) response to disk, hashing each chunk
async fn download_http(
    net: &NetClient,
    url: &Url,
    dest: &Path,
) -> Result<(Checksum, u64), Error> {
    let response = net
        .inner()
        .get(url.clone())
        .send()
        .await
        .map_err(|e| AcquireError::Incomplete {
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquireError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }

    let mut file = File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    let mut hasher = Hasher::new();
    let mut total_bytes = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AcquireError::Incomplete {
            message: e.to_string(),
        })?;
        hasher.update(&chunk);
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;
        total_bytes += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    Ok((hasher.finalize(), total_bytes))
}

/// Copy a `file://` archive, hashing while copying
async fn copy_local(url: &Url, dest: &Path) -> Result<(Checksum, u64), Error> {
    let source = url
        .to_file_path()
        .map_err(|()| AcquireError::InvalidUrl(url.to_string()))?;

    let reader = File::open(&source)
        .await
        .map_err(|_| AcquireError::LocalSourceNotFound {
            path: source.display().to_string(),
        })?;
    let writer = File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    Checksum::hash_and_copy(reader, writer).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> NetClient {
        NetClient::new(5).unwrap()
    }

    fn file_url(path: &Path) -> String {
        Url::from_file_path(path).unwrap().to_string()
    }

    #[test]
    fn test_validate_url_protocols() {
        assert!(validate_url("https://example.com/a.tar.gz").is_ok());
        assert!(validate_url("file:///tmp/a.tar.gz").is_ok());
        assert!(validate_url("ftp://example.com/a.tar.gz").is_err());
        assert!(validate_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_fetch_local_source_with_matching_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("src.tar.gz");
        tokio::fs::write(&archive, b"archive bytes").await.unwrap();

        let dest = dir.path().join("fetched.tar.gz");
        let expected = Checksum::from_data(b"archive bytes");
        let (tx, _rx) = nutforge_events::channel();

        let path = fetch_source(&test_client(), &file_url(&archive), &dest, &expected, &tx)
            .await
            .unwrap();
        assert_eq!(path, dest);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"archive bytes");
    }

    #[tokio::test]
    async fn test_fetch_checksum_mismatch_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("src.tar.gz");
        tokio::fs::write(&archive, b"archive bytes").await.unwrap();

        let dest = dir.path().join("fetched.tar.gz");
        let wrong = Checksum::from_data(b"different bytes");
        let (tx, _rx) = nutforge_events::channel();

        let err = fetch_source(&test_client(), &file_url(&archive), &dest, &wrong, &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Acquire(AcquireError::ChecksumMismatch { .. })
        ));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_missing_local_source() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("fetched.tar.gz");
        let expected = Checksum::from_data(b"whatever");
        let (tx, _rx) = nutforge_events::channel();

        let missing = dir.path().join("no-such-file.tar.gz");
        let err = fetch_source(&test_client(), &file_url(&missing), &dest, &expected, &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Acquire(AcquireError::LocalSourceNotFound { .. })
        ));
    }
}
