use crate::captions::PayloadLocator;
use crate::config::HttpSettings;
use crate::error::{Result, UndertekstError};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Retrieves caption payloads. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct PayloadFetcher {
    client: Client,
}

impl PayloadFetcher {
    /// Create a fetcher with default HTTP settings.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpSettings::default())
    }

    /// Create a fetcher with custom HTTP settings.
    pub fn with_config(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .user_agent(&settings.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the bytes behind a locator.
    pub async fn fetch(&self, locator: &PayloadLocator) -> Result<Vec<u8>> {
        match locator {
            PayloadLocator::LocalFile(path) => Self::read_file(path).await,
            PayloadLocator::Remote(url) => self.download(url).await,
        }
    }

    async fn read_file(path: &Path) -> Result<Vec<u8>> {
        debug!("Reading caption file {}", path.display());
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UndertekstError::Retrieval(format!("Caption file not found: {}", path.display()))
            } else {
                UndertekstError::Retrieval(format!(
                    "Cannot read caption file {}: {}",
                    path.display(),
                    e
                ))
            }
        })
    }

    #[instrument(skip(self))]
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UndertekstError::Retrieval(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UndertekstError::Retrieval(format!(
                "Caption URL returned HTTP {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UndertekstError::Retrieval(format!("Failed to read response: {}", e)))?;

        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
