//! Iconify icon search provider.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::provider::{HitPage, SearchProvider};
use crate::{ImageError, ImageHit, Result, DEFAULT_REQUEST_TIMEOUT};

/// Root of the Iconify API; search and render endpoints both live under it.
pub(crate) const ICONIFY_API_ROOT: &str = "https://api.iconify.design";

/// Fixed pixel size rendered icons are requested at.
const ICON_SIZE: u32 = 256;

/// Icon search provider backed by the Iconify API.
///
/// Each returned icon identifier `family:name` is mapped to a hit whose URL
/// points at the SVG render endpoint for that icon.
pub struct Iconify {
    client: Client,
    api_root: String,
}

impl Iconify {
    /// Creates a new Iconify provider with the default request timeout.
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
            api_root: ICONIFY_API_ROOT.to_string(),
        }
    }

    /// Overrides the API root. Intended for tests against a local server.
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }
}

impl Default for Iconify {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct IconifyResponse {
    #[serde(default)]
    start: u32,
    #[serde(default)]
    limit: u32,
    #[serde(default)]
    icons: Vec<String>,
    #[serde(default)]
    collections: Value,
}

/// Builds a prefix -> display name map from the response's collections field.
///
/// The field may be a list of `{prefix, name}` entries or a map keyed by
/// prefix; anything absent or malformed yields an empty map.
fn collection_names(collections: &Value) -> HashMap<String, String> {
    let mut names = HashMap::new();
    match collections {
        Value::Array(entries) => {
            for entry in entries {
                if let (Some(prefix), Some(name)) = (
                    entry.get("prefix").and_then(Value::as_str),
                    entry.get("name").and_then(Value::as_str),
                ) {
                    names.insert(prefix.to_string(), name.to_string());
                }
            }
        }
        Value::Object(map) => {
            for (prefix, info) in map {
                if let Some(name) = info.get("name").and_then(Value::as_str) {
                    names.insert(prefix.clone(), name.to_string());
                }
            }
        }
        _ => {}
    }
    names
}

/// Splits an icon name into word tokens and appends the collection name.
fn prompt_tags(name: &str, collection: Option<&String>) -> Vec<String> {
    let mut tags: Vec<String> = name
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(collection) = collection {
        tags.push(collection.clone());
    }
    tags
}

fn hits_from_response(response: &IconifyResponse, api_root: &str) -> Vec<ImageHit> {
    let collections = collection_names(&response.collections);
    response
        .icons
        .iter()
        .filter_map(|id| {
            let (family, name) = id.split_once(':')?;
            Some(ImageHit {
                url: format!("{api_root}/{family}/{name}.svg?width={ICON_SIZE}"),
                prompt: prompt_tags(name, collections.get(family)),
                width: ICON_SIZE,
                height: ICON_SIZE,
            })
        })
        .collect()
}

#[async_trait]
impl SearchProvider for Iconify {
    async fn search(&self, query: &str) -> Result<HitPage> {
        let url = format!(
            "{}/search?query={}",
            self.api_root,
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

        let body: IconifyResponse = response.json().await?;
        let hits = hits_from_response(&body, &self.api_root);

        Ok(HitPage {
            page: body.start + 1,
            page_size: body.limit,
            hits,
        })
    }

    fn name(&self) -> &str {
        "Iconify"
    }
}
