//! # pixseek
//!
//! An embeddable image search and acquisition library.
//!
//! Two independent pipelines are provided:
//!
//! - **Search**: cascading query relaxation against an icon search provider
//!   (full phrase, progressively shorter prefixes, then single keywords),
//!   plus a category router to a picture provider.
//! - **Download**: provider-aware URL adaptation, a size-bounded fetch,
//!   fit-without-enlargement resizing, optional SVG-to-raster transcoding,
//!   and persistence with best-effort metadata probing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pixseek::{DownloadRequest, Downloader, IconSearch};
//!
//! #[tokio::main]
//! async fn main() {
//!     let search = IconSearch::new();
//!     let result = search.search("red home icon").await;
//!
//!     if let Some(hit) = result.images.first() {
//!         let downloader = Downloader::new();
//!         let request = DownloadRequest::new(&hit.url, "images/home.png")
//!             .with_width(64)
//!             .with_height(64);
//!         let saved = downloader.download(&request).await;
//!         println!("{:?}", saved.saved_path);
//!     }
//! }
//! ```

use std::time::Duration;

mod adapt;
mod download;
mod error;
mod fetch;
mod persist;
mod provider;
mod query;
mod result;
mod search;
mod transform;

pub mod providers;

pub use adapt::{RenderHints, UrlAdapter, UrlRewriter};
pub use download::{DownloadRequest, Downloader};
pub use error::{ImageError, Result};
pub use fetch::{FetchedImage, ImageFetcher, MAX_IMAGE_BYTES};
pub use persist::persist;
pub use provider::{HitPage, SearchProvider};
pub use query::{Candidates, SearchQuery};
pub use result::{DownloadResult, ImageHit, ImageInfo, SearchResult};
pub use search::{IconSearch, ImageSearch};
pub use transform::{is_vector_source, transform};

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
