//! Normalized news headline.
//!
//! Every news provider maps its own article shape onto [`NewsItem`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub source_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl NewsItem {
    /// Creates a news item with the required fields.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            image_url: None,
            source_name: source_name.into(),
            published_at: None,
            description: None,
        }
    }

    /// Builder method to add an image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Builder method to add the publication time.
    #[must_use]
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Builder method to add a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Publication time at minute precision, e.g. `2024-05-01 09:30`.
    #[must_use]
    pub fn published_display(&self) -> Option<String> {
        self.published_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
    }
}
