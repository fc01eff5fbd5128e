//! Search provider trait.

use async_trait::async_trait;

use crate::{ImageHit, Result};

/// One page of hits from a single search attempt.
#[derive(Debug, Clone, Default)]
pub struct HitPage {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of hits per page reported by the provider.
    pub page_size: u32,
    /// The matched images; may be empty.
    pub hits: Vec<ImageHit>,
}

/// Trait for image search providers.
///
/// A provider issues one request per call and maps the raw response into
/// normalized hits. Transport failures and non-2xx statuses are returned as
/// errors; an empty `hits` list on `Ok` means the provider answered but
/// nothing matched.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Performs one search attempt for the given query text.
    async fn search(&self, query: &str) -> Result<HitPage>;

    /// Returns the provider name for logging.
    fn name(&self) -> &str;
}
