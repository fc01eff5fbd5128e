//! Image acquisition: adapt, fetch, transform, persist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::adapt::{RenderHints, UrlAdapter};
use crate::fetch::ImageFetcher;
use crate::persist::persist;
use crate::transform::transform;
use crate::{DownloadResult, ImageInfo, Result};

/// A request to download one image to local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// URL of the image to download.
    pub url: String,
    /// Local destination path; its extension selects the persisted format.
    pub path: PathBuf,
    /// Requested width in pixels.
    pub width: Option<u32>,
    /// Requested height in pixels.
    pub height: Option<u32>,
    /// Background/foreground color hint (hex, `#` optional).
    pub color: Option<String>,
}

impl DownloadRequest {
    /// Creates a request for `url` saved at `path`.
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            width: None,
            height: None,
            color: None,
        }
    }

    /// Sets the requested width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the requested height.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the color hint.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Downloads and normalizes single images.
///
/// Sequences URL adaptation, the bounded fetch, the conditional
/// resize/transcode, and persistence as one failure domain: any error along
/// the chain is caught here and reported in the returned result rather than
/// raised to the caller.
pub struct Downloader {
    adapter: UrlAdapter,
    fetcher: ImageFetcher,
}

impl Downloader {
    /// Creates a downloader with the default adapter and fetcher.
    pub fn new() -> Self {
        Self {
            adapter: UrlAdapter::new(),
            fetcher: ImageFetcher::new(),
        }
    }

    /// Creates a downloader with a custom fetcher.
    pub fn with_fetcher(fetcher: ImageFetcher) -> Self {
        Self {
            adapter: UrlAdapter::new(),
            fetcher,
        }
    }

    /// Downloads the requested image, returning a structured result.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadResult {
        match self.acquire(request).await {
            Ok(info) => DownloadResult::saved(&request.path, info),
            Err(e) => {
                error!(
                    url = %request.url,
                    path = %request.path.display(),
                    error = %e,
                    "download failed"
                );
                DownloadResult::failed(e.to_string())
            }
        }
    }

    async fn acquire(&self, request: &DownloadRequest) -> Result<ImageInfo> {
        let hints = RenderHints {
            width: request.width,
            height: request.height,
            color: request.color.clone(),
        };

        let final_url = self.adapter.adapt(&request.url, &hints)?;
        if final_url != request.url {
            debug!(url = %request.url, adapted = %final_url, "adapted URL for provider");
        }

        let fetched = self.fetcher.fetch(&final_url).await?;

        // The vector check runs against the original URL, not the adapted one.
        let bytes = transform(
            &fetched.bytes,
            fetched.content_type.as_deref(),
            &request.url,
            &destination_extension(&request.path),
            request.width,
            request.height,
        )?;

        persist(&bytes, &request.path).await
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

fn destination_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_request_new() {
        let request = DownloadRequest::new("https://x/a.png", "images/a.png");
        assert_eq!(request.url, "https://x/a.png");
        assert_eq!(request.path, PathBuf::from("images/a.png"));
        assert!(request.width.is_none());
        assert!(request.height.is_none());
        assert!(request.color.is_none());
    }

    #[test]
    fn test_download_request_builder_chain() {
        let request = DownloadRequest::new("https://x/a.svg", "a.png")
            .with_width(32)
            .with_height(32)
            .with_color("#FF0000");
        assert_eq!(request.width, Some(32));
        assert_eq!(request.height, Some(32));
        assert_eq!(request.color.as_deref(), Some("#FF0000"));
    }

    #[test]
    fn test_download_request_serialization() {
        let request = DownloadRequest::new("https://x/a.png", "a.png").with_width(100);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"width\":100"));
        let back: DownloadRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.url, request.url);
    }

    #[test]
    fn test_destination_extension() {
        assert_eq!(destination_extension(Path::new("a/b/pic.PNG")), "png");
        assert_eq!(destination_extension(Path::new("a/b/pic.jpeg")), "jpeg");
        assert_eq!(destination_extension(Path::new("a/b/pic")), "");
    }

    #[tokio::test]
    async fn test_download_unreachable_host_reports_failure() {
        let fetcher = ImageFetcher::with_timeout(std::time::Duration::from_millis(200));
        let downloader = Downloader::with_fetcher(fetcher);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.png");
        let request = DownloadRequest::new("http://127.0.0.1:1/a.png", &path);

        let result = downloader.download(&request).await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert!(result.saved_path.is_none());
        assert!(!path.exists(), "no partial file on failure");
    }

    #[tokio::test]
    async fn test_downloader_default() {
        let _downloader = Downloader::default();
    }
}
