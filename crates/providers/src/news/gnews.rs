//! GNews `top-headlines` client, used as the secondary headline provider.

use super::{normalize_article, NewsProvider, NewsRequest};
use crate::error::{ProviderError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use market_pulse_core::NewsProviderConfig;
use market_pulse_data::NewsItem;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// GNews caps `max` per request on its free tier.
const MAX_PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

impl RawArticle {
    fn into_item(self) -> Option<NewsItem> {
        normalize_article(
            self.title,
            self.url,
            self.source.and_then(|s| s.name),
            self.image,
            self.published_at.as_deref(),
            self.description,
        )
    }
}

pub struct GNewsClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for GNewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GNewsClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl GNewsClient {
    pub fn new(http: HttpClient, config: &NewsProviderConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl NewsProvider for GNewsClient {
    fn name(&self) -> &'static str {
        "gnews"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_headlines(&self, request: &NewsRequest) -> Result<Vec<NewsItem>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::missing_api_key(self.name()))?;

        let url = format!("{}/top-headlines", self.base_url);
        let max = request.max_articles.clamp(1, MAX_PAGE_SIZE).to_string();
        let builder = self.http.get(&url).query(&[
            ("category", request.category.as_str()),
            ("country", request.country.as_str()),
            ("lang", "en"),
            ("max", max.as_str()),
            ("apikey", api_key.expose_secret()),
        ]);

        let raw: RawResponse = self.http.send_json(builder).await?;
        if let Some(errors) = raw.errors {
            return Err(ProviderError::decode(format!("gnews errors: {errors}")));
        }

        let items: Vec<NewsItem> = raw
            .articles
            .into_iter()
            .filter_map(RawArticle::into_item)
            .take(request.max_articles)
            .collect();
        tracing::debug!(count = items.len(), "gnews headlines fetched");
        Ok(items)
    }
}
