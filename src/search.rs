//! Search orchestration: cascading relaxation and category routing.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::providers::{Civitai, Iconify};
use crate::{SearchProvider, SearchQuery, SearchResult};

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Icon search with cascading query relaxation.
///
/// Candidates from [`SearchQuery::candidates`] are tried in order against
/// the provider; the first attempt that yields at least one hit wins. An
/// attempt that errors or comes back empty just advances the cascade — only
/// exhaustion produces the "Not found content" result.
pub struct IconSearch {
    provider: Arc<dyn SearchProvider>,
}

impl IconSearch {
    /// Creates an icon search backed by the Iconify provider.
    pub fn new() -> Self {
        Self::with_provider(Arc::new(Iconify::new()))
    }

    /// Creates an icon search backed by a custom provider.
    pub fn with_provider(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Searches for icons matching the raw keyword query.
    ///
    /// Never returns an error: failures are folded into the result, and the
    /// elapsed wall-clock time is attached to every outcome.
    pub async fn search(&self, raw_query: &str) -> SearchResult {
        let start = Instant::now();
        let query = SearchQuery::new(raw_query);

        if query.is_empty() {
            return SearchResult::not_found(elapsed_ms(start));
        }

        for candidate in query.candidates() {
            debug!(provider = self.provider.name(), %candidate, "search attempt");
            match self.provider.search(&candidate).await {
                Ok(page) if !page.hits.is_empty() => {
                    debug!(%candidate, hits = page.hits.len(), "search hit");
                    return SearchResult::found(page, elapsed_ms(start));
                }
                Ok(_) => {
                    debug!(%candidate, "no hits, relaxing query");
                }
                Err(e) => {
                    warn!(%candidate, error = %e, "search attempt failed, relaxing query");
                }
            }
        }

        SearchResult::not_found(elapsed_ms(start))
    }
}

impl Default for IconSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// Category-aware entry point over both search providers.
///
/// The `icon` category routes to the relaxation search; any other category
/// is prepended to the query text and sent to the picture provider as a
/// single attempt.
pub struct ImageSearch {
    icons: IconSearch,
    pictures: Arc<dyn SearchProvider>,
}

impl ImageSearch {
    /// Creates a search over the default Iconify and Civitai providers.
    pub fn new() -> Self {
        Self {
            icons: IconSearch::new(),
            pictures: Arc::new(Civitai::new()),
        }
    }

    /// Creates a search over custom providers.
    pub fn with_providers(
        icon_provider: Arc<dyn SearchProvider>,
        picture_provider: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            icons: IconSearch::with_provider(icon_provider),
            pictures: picture_provider,
        }
    }

    /// Searches the provider selected by `category` (icon | picture |
    /// background | portrait | ...).
    pub async fn search(&self, category: &str, query: &str) -> SearchResult {
        if category.eq_ignore_ascii_case("icon") {
            return self.icons.search(query).await;
        }

        let start = Instant::now();
        let combined = format!("{category} {query}").trim().to_string();
        debug!(provider = self.pictures.name(), query = %combined, "picture search");
        match self.pictures.search(&combined).await {
            Ok(page) => SearchResult::found(page, elapsed_ms(start)),
            Err(e) => {
                warn!(query = %combined, error = %e, "picture search failed");
                SearchResult::failure(e.to_string(), elapsed_ms(start))
            }
        }
    }
}

impl Default for ImageSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HitPage;
    use crate::{ImageError, ImageHit, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: pops one response per call and records queries.
    struct MockProvider {
        responses: Mutex<Vec<Result<HitPage>>>,
        queries: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(responses: Vec<Result<HitPage>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for MockProvider {
        async fn search(&self, query: &str) -> Result<HitPage> {
            self.queries.lock().unwrap().push(query.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(HitPage::default())
            } else {
                responses.remove(0)
            }
        }

        fn name(&self) -> &str {
            "Mock"
        }
    }

    fn page_with_hits(count: usize) -> HitPage {
        HitPage {
            page: 1,
            page_size: 64,
            hits: (0..count)
                .map(|i| ImageHit {
                    url: format!("https://example.com/{i}.svg"),
                    prompt: vec![],
                    width: 256,
                    height: 256,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_empty_query_immediate_not_found() {
        let provider = Arc::new(MockProvider::new(vec![Ok(page_with_hits(3))]));
        let search = IconSearch::with_provider(provider.clone());

        let result = search.search("   ").await;

        assert!(!result.success);
        assert_eq!(result.error, "Not found content");
        assert!(result.images.is_empty());
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 1);
        assert!(provider.queries().is_empty(), "no provider call for empty query");
    }

    #[tokio::test]
    async fn test_first_hit_short_circuits() {
        let provider = Arc::new(MockProvider::new(vec![Ok(page_with_hits(2))]));
        let search = IconSearch::with_provider(provider.clone());

        let result = search.search("red home icon").await;

        assert!(result.success);
        assert!(result.error.is_empty());
        assert_eq!(result.images.len(), 2);
        assert_eq!(provider.queries(), vec!["red home icon"]);
    }

    #[tokio::test]
    async fn test_empty_pages_relax_in_order() {
        let provider = Arc::new(MockProvider::new(vec![
            Ok(HitPage::default()),
            Ok(HitPage::default()),
            Ok(page_with_hits(1)),
        ]));
        let search = IconSearch::with_provider(provider.clone());

        let result = search.search("red home icon").await;

        assert!(result.success);
        assert_eq!(
            provider.queries(),
            vec!["red home icon", "red home", "red"]
        );
    }

    #[tokio::test]
    async fn test_error_attempt_continues_cascade() {
        let provider = Arc::new(MockProvider::new(vec![
            Err(ImageError::HttpStatus {
                status: 503,
                reason: "Service Unavailable".to_string(),
            }),
            Ok(page_with_hits(1)),
        ]));
        let search = IconSearch::with_provider(provider.clone());

        let result = search.search("home icon").await;

        assert!(result.success, "a failed attempt must not stop the cascade");
        assert_eq!(provider.queries(), vec!["home icon", "home"]);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_not_found() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let search = IconSearch::with_provider(provider.clone());

        let result = search.search("red home").await;

        assert!(!result.success);
        assert_eq!(result.error, "Not found content");
        // Phase 1 prefixes, then phase 2 single tokens.
        assert_eq!(
            provider.queries(),
            vec!["red home", "red", "red", "home"]
        );
    }

    #[tokio::test]
    async fn test_phase_two_reached_after_prefixes() {
        let provider = Arc::new(MockProvider::new(vec![
            Ok(HitPage::default()),
            Ok(HitPage::default()),
            Ok(HitPage::default()),
            Ok(page_with_hits(1)),
        ]));
        let search = IconSearch::with_provider(provider.clone());

        let result = search.search("alpha beta").await;

        assert!(result.success);
        assert_eq!(
            provider.queries(),
            vec!["alpha beta", "alpha", "alpha", "beta"]
        );
    }

    #[tokio::test]
    async fn test_query_time_recorded() {
        let provider = Arc::new(MockProvider::new(vec![Ok(page_with_hits(1))]));
        let search = IconSearch::with_provider(provider);

        let result = search.search("home").await;
        // u64 is always >= 0; just make sure the field is populated sanely.
        assert!(result.query_time < 60_000);
    }

    #[tokio::test]
    async fn test_router_icon_category() {
        let icons = Arc::new(MockProvider::new(vec![Ok(page_with_hits(1))]));
        let pictures = Arc::new(MockProvider::new(vec![]));
        let search = ImageSearch::with_providers(icons.clone(), pictures.clone());

        let result = search.search("icon", "home").await;

        assert!(result.success);
        assert_eq!(icons.queries(), vec!["home"]);
        assert!(pictures.queries().is_empty());
    }

    #[tokio::test]
    async fn test_router_other_category_prepends_type() {
        let icons = Arc::new(MockProvider::new(vec![]));
        let pictures = Arc::new(MockProvider::new(vec![Ok(page_with_hits(1))]));
        let search = ImageSearch::with_providers(icons.clone(), pictures.clone());

        let result = search.search("portrait", "woman in red").await;

        assert!(result.success);
        assert_eq!(pictures.queries(), vec!["portrait woman in red"]);
        assert!(icons.queries().is_empty());
    }

    #[tokio::test]
    async fn test_router_picture_failure_folded_into_result() {
        let icons = Arc::new(MockProvider::new(vec![]));
        let pictures = Arc::new(MockProvider::new(vec![Err(ImageError::Other(
            "connection refused".to_string(),
        ))]));
        let search = ImageSearch::with_providers(icons, pictures);

        let result = search.search("picture", "castle").await;

        assert!(!result.success);
        assert_eq!(result.error, "connection refused");
        assert!(result.images.is_empty());
    }

    #[tokio::test]
    async fn test_router_picture_no_relaxation() {
        // The picture provider gets exactly one attempt, even when empty.
        let icons = Arc::new(MockProvider::new(vec![]));
        let pictures = Arc::new(MockProvider::new(vec![Ok(HitPage::default())]));
        let search = ImageSearch::with_providers(icons, pictures.clone());

        let result = search.search("background", "sunset beach").await;

        assert!(result.success);
        assert!(result.images.is_empty());
        assert_eq!(pictures.queries().len(), 1);
    }
}
