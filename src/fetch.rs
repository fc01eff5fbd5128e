//! Bounded image download.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::{ImageError, Result, DEFAULT_REQUEST_TIMEOUT};

/// Maximum downloaded image size: 10 MiB.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// A downloaded image body with its reported content type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw body bytes.
    pub bytes: Vec<u8>,
    /// Value of the `Content-Type` response header, if any.
    pub content_type: Option<String>,
}

/// Downloads image bodies over HTTP, enforcing a byte-size ceiling before
/// any further processing.
pub struct ImageFetcher {
    client: Client,
    max_bytes: u64,
}

impl ImageFetcher {
    /// Creates a fetcher with the default timeout and size ceiling.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a fetcher whose requests use the given timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (compatible; pixseek/0.1)")
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    /// Overrides the size ceiling in bytes.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetches the image at `url`.
    ///
    /// Fails on non-2xx statuses and on bodies longer than the ceiling; the
    /// size check runs before the bytes are handed to any decoder or writer.
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(ImageError::SizeLimit {
                actual_mb: bytes.len() as f64 / (1024.0 * 1024.0),
                limit_mb: self.max_bytes / (1024 * 1024),
            });
        }

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}
