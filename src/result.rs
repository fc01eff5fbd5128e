//! Search and download result types.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::provider::HitPage;

/// One candidate image returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHit {
    /// URL the image can be fetched from.
    pub url: String,
    /// Ordered tag tokens describing the image.
    pub prompt: Vec<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Outcome of one search call.
///
/// Exactly one of (`success` with empty `error`) or (`!success` with
/// non-empty `error` and empty `images`) holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Whether at least one image was found.
    pub success: bool,
    /// Failure reason; empty on success.
    pub error: String,
    /// Wall-clock milliseconds from call entry to completion.
    pub query_time: u64,
    /// Result page (1-indexed).
    pub page: u32,
    /// Number of hits per page reported by the provider.
    pub page_size: u32,
    /// The matched images.
    pub images: Vec<ImageHit>,
}

/// Error text returned when every relaxation candidate came up empty.
pub(crate) const NOT_FOUND_ERROR: &str = "Not found content";

impl SearchResult {
    /// Creates a successful result from a provider page.
    pub fn found(page: HitPage, query_time: u64) -> Self {
        Self {
            success: true,
            error: String::new(),
            query_time,
            page: page.page,
            page_size: page.page_size,
            images: page.hits,
        }
    }

    /// Creates the typed "nothing matched" result.
    pub fn not_found(query_time: u64) -> Self {
        Self::failure(NOT_FOUND_ERROR, query_time)
    }

    /// Creates a failed result with the given error text.
    pub fn failure(error: impl Into<String>, query_time: u64) -> Self {
        Self {
            success: false,
            error: error.into(),
            query_time,
            page: 1,
            page_size: 1,
            images: Vec::new(),
        }
    }
}

/// Metadata probed from a downloaded image.
///
/// Every field is optional: an absent field means the best-effort probe
/// failed for it, not that the download failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// Image format (e.g. "png", "jpg").
    pub format: Option<String>,
    /// File size in bytes.
    pub size: Option<u64>,
}

/// Outcome of one download call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    /// Whether the image was downloaded and saved.
    pub success: bool,
    /// Human-readable status on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Destination path the image was written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_path: Option<String>,
    /// Probed metadata of the saved image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_info: Option<ImageInfo>,
}

impl DownloadResult {
    /// Creates a successful result for an image saved at `path`.
    pub fn saved(path: &Path, info: ImageInfo) -> Self {
        let path = path.display().to_string();
        Self {
            success: true,
            message: Some(format!("Image downloaded and saved to {path}")),
            error: None,
            saved_path: Some(path),
            image_info: Some(info),
        }
    }

    /// Creates a failed result with the given error text.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            saved_path: None,
            image_info: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_page() -> HitPage {
        HitPage {
            page: 2,
            page_size: 64,
            hits: vec![ImageHit {
                url: "https://example.com/a.png".to_string(),
                prompt: vec!["a".to_string()],
                width: 256,
                height: 256,
            }],
        }
    }

    #[test]
    fn test_search_result_found() {
        let result = SearchResult::found(sample_page(), 120);
        assert!(result.success);
        assert!(result.error.is_empty());
        assert_eq!(result.query_time, 120);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 64);
        assert_eq!(result.images.len(), 1);
    }

    #[test]
    fn test_search_result_not_found() {
        let result = SearchResult::not_found(5);
        assert!(!result.success);
        assert_eq!(result.error, "Not found content");
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 1);
        assert!(result.images.is_empty());
    }

    #[test]
    fn test_search_result_failure() {
        let result = SearchResult::failure("boom", 7);
        assert!(!result.success);
        assert_eq!(result.error, "boom");
        assert!(result.images.is_empty());
        assert_eq!(result.query_time, 7);
    }

    #[test]
    fn test_search_result_serialization() {
        let result = SearchResult::found(sample_page(), 42);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"query_time\":42"));
        assert!(json.contains("\"page_size\":64"));
    }

    #[test]
    fn test_image_info_default() {
        let info = ImageInfo::default();
        assert!(info.width.is_none());
        assert!(info.height.is_none());
        assert!(info.format.is_none());
        assert!(info.size.is_none());
    }

    #[test]
    fn test_download_result_saved() {
        let info = ImageInfo {
            width: Some(32),
            height: Some(32),
            format: Some("png".to_string()),
            size: Some(512),
        };
        let result = DownloadResult::saved(&PathBuf::from("images/out.png"), info.clone());
        assert!(result.success);
        assert_eq!(result.saved_path.as_deref(), Some("images/out.png"));
        assert_eq!(result.image_info, Some(info));
        assert!(result
            .message
            .unwrap()
            .contains("saved to images/out.png"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_download_result_failed() {
        let result = DownloadResult::failed("no route to host");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("no route to host"));
        assert!(result.saved_path.is_none());
        assert!(result.image_info.is_none());
    }

    #[test]
    fn test_download_result_serialization_camel_case() {
        let result = DownloadResult::saved(&PathBuf::from("a.png"), ImageInfo::default());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"savedPath\":\"a.png\""));
        assert!(json.contains("\"imageInfo\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_image_hit_serialization() {
        let hit = ImageHit {
            url: "https://api.iconify.design/mdi/home.svg?width=256".to_string(),
            prompt: vec!["home".to_string(), "Material Design Icons".to_string()],
            width: 256,
            height: 256,
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"width\":256"));
        let back: ImageHit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hit);
    }
}
