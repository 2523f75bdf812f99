//! Headline providers and the primary/fallback chain over them.

pub mod fallback;
pub mod gnews;
pub mod newsapi;

pub use fallback::FallbackNewsSource;
pub use gnews::GNewsClient;
pub use newsapi::NewsApiClient;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_pulse_core::NewsConfig;
use market_pulse_data::NewsItem;

/// Which headlines to ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewsRequest {
    pub category: String,
    pub country: String,
    pub max_articles: usize,
}

impl NewsRequest {
    pub fn new(category: impl Into<String>, country: impl Into<String>, max_articles: usize) -> Self {
        Self {
            category: category.into(),
            country: country.into(),
            max_articles,
        }
    }
}

impl From<&NewsConfig> for NewsRequest {
    fn from(config: &NewsConfig) -> Self {
        Self::new(&config.category, &config.country, config.max_articles)
    }
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// False when the provider lacks credentials; such providers are skipped.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetches normalized headlines, at most `request.max_articles`.
    async fn fetch_headlines(&self, request: &NewsRequest) -> Result<Vec<NewsItem>>;
}

/// Shared normalization for provider article shapes.
pub(crate) fn normalize_article(
    title: Option<String>,
    url: Option<String>,
    source_name: Option<String>,
    image_url: Option<String>,
    published_at: Option<&str>,
    description: Option<String>,
) -> Option<NewsItem> {
    let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
    // NewsAPI keeps placeholders for withdrawn articles.
    if title == "[Removed]" {
        return None;
    }

    let mut item = NewsItem::new(
        title,
        url.unwrap_or_default(),
        source_name.unwrap_or_else(|| "Unknown".to_string()),
    );
    if let Some(image) = image_url.filter(|u| !u.is_empty()) {
        item = item.with_image_url(image);
    }
    if let Some(ts) = published_at.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) {
        item = item.with_published_at(ts.with_timezone(&Utc));
    }
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        item = item.with_description(description);
    }
    Some(item)
}
