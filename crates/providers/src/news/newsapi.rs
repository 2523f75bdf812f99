//! NewsAPI `top-headlines` client.

use super::{normalize_article, NewsProvider, NewsRequest};
use crate::error::{ProviderError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use market_pulse_core::NewsProviderConfig;
use market_pulse_data::NewsItem;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    source: Option<RawSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
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
            self.url_to_image,
            self.published_at.as_deref(),
            self.description,
        )
    }
}

pub struct NewsApiClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl NewsApiClient {
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
impl NewsProvider for NewsApiClient {
    fn name(&self) -> &'static str {
        "newsapi"
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
        let page_size = request.max_articles.to_string();
        let builder = self
            .http
            .get(&url)
            .header("X-Api-Key", api_key.expose_secret())
            .query(&[
                ("country", request.country.as_str()),
                ("category", request.category.as_str()),
                ("pageSize", page_size.as_str()),
            ]);

        let raw: RawResponse = self.http.send_json(builder).await?;
        if raw.status != "ok" {
            return Err(ProviderError::decode(format!(
                "newsapi status {}: {} {}",
                raw.status,
                raw.code.unwrap_or_default(),
                raw.message.unwrap_or_default()
            )));
        }

        let items: Vec<NewsItem> = raw
            .articles
            .into_iter()
            .filter_map(RawArticle::into_item)
            .take(request.max_articles)
            .collect();
        tracing::debug!(count = items.len(), "newsapi headlines fetched");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonzero_ext::nonzero;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, key: Option<&str>) -> NewsApiClient {
        let http = HttpClient::with_settings(Duration::from_secs(5), "test", nonzero!(600u32)).unwrap();
        let mut config = NewsProviderConfig::new(server.uri());
        if let Some(key) = key {
            config = config.with_api_key(key);
        }
        NewsApiClient::new(http, &config)
    }

    #[tokio::test]
    async fn test_fetch_headlines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(header("X-Api-Key", "key-1"))
            .and(query_param("country", "in"))
            .and(query_param("category", "business"))
            .and(query_param("pageSize", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 3,
                "articles": [
                    {
                        "source": {"id": null, "name": "Mint"},
                        "title": "Sensex jumps 500 points",
                        "url": "https://example.com/1",
                        "urlToImage": "https://example.com/1.jpg",
                        "publishedAt": "2024-05-01T09:30:00Z"
                    },
                    {"source": {"name": "X"}, "title": "[Removed]", "url": "https://removed.com"},
                    {
                        "source": {"name": "ET"},
                        "title": "Rupee weakens",
                        "url": "https://example.com/2",
                        "urlToImage": null,
                        "publishedAt": "2024-05-01T10:00:00Z"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let items = client(&server, Some("key-1"))
            .fetch_headlines(&NewsRequest::new("business", "in", 2))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source_name, "Mint");
        assert_eq!(items[0].image_url.as_deref(), Some("https://example.com/1.jpg"));
        assert_eq!(items[1].title, "Rupee weakens");
        assert!(items[1].image_url.is_none());
    }

    #[tokio::test]
    async fn test_error_status_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "code": "apiKeyInvalid",
                "message": "Your API key is invalid"
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("bad"))
            .fetch_headlines(&NewsRequest::new("business", "in", 5))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("apiKeyInvalid"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let server = MockServer::start().await;
        let client = client(&server, None);

        assert!(!client.is_configured());
        let err = client
            .fetch_headlines(&NewsRequest::new("business", "in", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey { provider: "newsapi" }));
    }

    #[test]
    fn test_debug_hides_key() {
        let http = HttpClient::with_settings(Duration::from_secs(5), "test", nonzero!(60u32)).unwrap();
        let client = NewsApiClient::new(
            http,
            &NewsProviderConfig::new("https://newsapi.org/v2").with_api_key("sekrit"),
        );

        assert!(!format!("{client:?}").contains("sekrit"));
    }
}
