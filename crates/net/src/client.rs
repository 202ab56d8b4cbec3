//! HTTP client wrapper

use nutforge_errors::{AcquireError, Error};
use std::time::Duration;

/// Network client carrying the shared reqwest client and its limits
#[derive(Clone)]
pub struct NetClient {
    client: reqwest::Client,
}

impl NetClient {
    /// Create a client with the given request timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("nutforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AcquireError::Incomplete {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }

    /// Access the underlying reqwest client
    #[must_use]
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }
}
