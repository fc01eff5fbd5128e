//! Civitai picture search provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::provider::{HitPage, SearchProvider};
use crate::{ImageError, ImageHit, Result, DEFAULT_REQUEST_TIMEOUT};

const CIVITAI_SEARCH_ROOT: &str = "https://api.searchcivitai.com/api/images";

/// AI-generated picture search provider backed by the Civitai search API.
pub struct Civitai {
    client: Client,
    search_root: String,
}

impl Civitai {
    /// Creates a new Civitai provider with the default request timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a provider whose outbound requests use the given timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (compatible; pixseek/0.1)")
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            search_root: CIVITAI_SEARCH_ROOT.to_string(),
        }
    }

    /// Overrides the search endpoint root. Intended for tests.
    pub fn with_search_root(mut self, search_root: impl Into<String>) -> Self {
        self.search_root = search_root.into();
        self
    }
}

impl Default for Civitai {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct CivitaiResponse {
    #[serde(default)]
    page_number: u32,
    #[serde(default)]
    page_size: u32,
    #[serde(default)]
    images: Vec<CivitaiItem>,
}

#[derive(Deserialize, Default)]
struct CivitaiItem {
    #[serde(default)]
    image: Option<CivitaiImage>,
}

#[derive(Deserialize)]
struct CivitaiImage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    meta: Option<CivitaiMeta>,
}

#[derive(Deserialize)]
struct CivitaiMeta {
    #[serde(default)]
    prompt: Option<String>,
}

/// Splits comma-separated prompt text into trimmed tag tokens.
fn prompt_tags(prompt: &str) -> Vec<String> {
    prompt
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn hits_from_response(response: CivitaiResponse) -> Vec<ImageHit> {
    response
        .images
        .into_iter()
        .filter_map(|item| {
            let image = item.image?;
            let url = image.url?;
            let prompt = image
                .meta
                .and_then(|m| m.prompt)
                .map(|p| prompt_tags(&p))
                .unwrap_or_default();
            Some(ImageHit {
                url,
                prompt,
                width: image.width.unwrap_or_default(),
                height: image.height.unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl SearchProvider for Civitai {
    async fn search(&self, query: &str) -> Result<HitPage> {
        let url = format!(
            "{}?sort_by=default&nsfw=None&m=img&page=1&q={}",
            self.search_root,
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body: CivitaiResponse = response.json().await?;
        let page = body.page_number.max(1);
        let page_size = body.page_size;
        let hits = hits_from_response(body);

        Ok(HitPage {
            page,
            page_size,
            hits,
        })
    }

    fn name(&self) -> &str {
        "Civitai"
    }
}
