//! Remote source fetching.

use std::time::Duration;

use tracing::info;

use super::ResolveError;

/// Downloads the bytes of a remote source.
pub trait Fetcher: Send + Sync {
  fn fetch(&self, url: &str) -> Result<Vec<u8>, ResolveError>;
}

/// [`Fetcher`] backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: reqwest::blocking::Client,
}

impl HttpFetcher {
  pub fn new() -> Self {
    let client = reqwest::blocking::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .unwrap_or_else(|_| reqwest::blocking::Client::new());
    Self { client }
  }
}

impl Default for HttpFetcher {
  fn default() -> Self {
    Self::new()
  }
}

impl Fetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> Result<Vec<u8>, ResolveError> {
    info!(url = %url, "fetching remote source");

    let fetch_err = |message: String| ResolveError::Fetch {
      url: url.to_string(),
      message,
    };

    let response = self.client.get(url).send().map_err(|e| fetch_err(e.to_string()))?;

    if !response.status().is_success() {
      return Err(fetch_err(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().map_err(|e| fetch_err(e.to_string()))?;
    info!(url = %url, size = bytes.len(), "download complete");

    Ok(bytes.to_vec())
  }
}
