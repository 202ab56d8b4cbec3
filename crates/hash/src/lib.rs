#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! SHA-256 digests for source archive verification
//!
//! Upstream release archives publish SHA-256 digests, so that is the only
//! algorithm here. The digest width (32 bytes, 64 hex characters) is
//! enforced at parse time.

use nutforge_errors::{Error, RecipeError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// A SHA-256 digest value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    bytes: [u8; 32],
}

impl Checksum {
    /// Create a checksum from raw bytes
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Convert to lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse from hex string
    ///
    /// # Errors
    /// Returns an error if the input is not valid hexadecimal or is not
    /// exactly 64 characters (32 bytes).
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|e| RecipeError::InvalidChecksum {
            message: format!("invalid hex: {e}"),
        })?;

        if bytes.len() != 32 {
            return Err(RecipeError::InvalidChecksum {
                message: format!("digest must be 32 bytes, got {}", bytes.len()),
            }
            .into());
        }

        let mut array = [0u8; 32];
        array.copy_from_slice(&bytes);
        Ok(Self::from_bytes(array))
    }

    /// Compute the digest of a byte slice
    #[must_use]
    pub fn from_data(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self::from_bytes(digest.into())
    }

    /// Compute the digest of a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read.
    pub async fn hash_file(path: &Path) -> Result<Self, Error> {
        let mut file = File::open(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0; CHUNK_SIZE];

        loop {
            let n = file.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(Self::from_bytes(hasher.finalize().into()))
    }

    /// Compute the digest while copying data to a writer
    ///
    /// This is the single-pass fetch path: the archive is hashed as it is
    /// written so no second read is needed.
    ///
    /// # Errors
    /// Returns an error if reading from the reader or writing to the writer fails.
    pub async fn hash_and_copy<R, W>(mut reader: R, mut writer: W) -> Result<(Self, u64), Error>
    where
        R: AsyncReadExt + Unpin,
        W: AsyncWriteExt + Unpin,
    {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0; CHUNK_SIZE];
        let mut total_bytes = 0u64;

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }

            hasher.update(&buffer[..n]);
            writer.write_all(&buffer[..n]).await?;
            total_bytes += n as u64;
        }

        writer.flush().await?;
        Ok((Self::from_bytes(hasher.finalize().into()), total_bytes))
    }
}

/// Incremental digest computation for streamed downloads
#[derive(Default)]
pub struct Hasher {
    inner: Sha256,
}

impl Hasher {
    /// Create a new hasher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of data
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish and return the digest
    #[must_use]
    pub fn finalize(self) -> Checksum {
        Checksum::from_bytes(self.inner.finalize().into())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Checksum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Verify a file matches an expected digest
///
/// # Errors
/// Returns an error if the file cannot be read or hashed.
pub async fn verify_file(path: &Path, expected: &Checksum) -> Result<bool, Error> {
    let actual = Checksum::hash_file(path).await?;
    Ok(actual == *expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_checksum_basics() {
        let data = b"hello world";
        let checksum = Checksum::from_data(data);

        // Known SHA-256 digest of "hello world"
        let expected = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        assert_eq!(checksum.to_hex(), expected);
    }

    #[test]
    fn test_from_hex_rejects_wrong_width() {
        assert!(Checksum::from_hex("0000").is_err());
        assert!(Checksum::from_hex("zz").is_err());

        let ok = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        assert!(Checksum::from_hex(ok).is_ok());
    }

    #[test]
    fn test_checksum_serialization() {
        let checksum = Checksum::from_data(b"test");
        let json = serde_json::to_string(&checksum).unwrap();
        let deserialized: Checksum = serde_json::from_str(&json).unwrap();
        assert_eq!(checksum, deserialized);
    }

    #[tokio::test]
    async fn test_hash_file() {
        use std::io::Write;
        let mut temp = NamedTempFile::new().unwrap();
        let data = b"test file content";
        temp.write_all(data).unwrap();

        let checksum = Checksum::hash_file(temp.path()).await.unwrap();
        let expected = Checksum::from_data(data);
        assert_eq!(checksum, expected);
    }

    #[tokio::test]
    async fn test_hash_and_copy() {
        let data = b"data to copy";
        let reader = std::io::Cursor::new(data);
        let mut writer = Vec::new();

        let (checksum, bytes) = Checksum::hash_and_copy(reader, &mut writer).await.unwrap();

        assert_eq!(writer, data);
        assert_eq!(bytes, data.len() as u64);
        assert_eq!(checksum, Checksum::from_data(data));
    }

    #[tokio::test]
    async fn test_verify_file() {
        use std::io::Write;
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"archive bytes").unwrap();

        let good = Checksum::from_data(b"archive bytes");
        let bad = Checksum::from_data(b"other bytes");
        assert!(verify_file(temp.path(), &good).await.unwrap());
        assert!(!verify_file(temp.path(), &bad).await.unwrap());
    }
}
