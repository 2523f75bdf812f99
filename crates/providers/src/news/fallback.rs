use super::{NewsProvider, NewsRequest};
use crate::outcome::FetchOutcome;
use market_pulse_data::NewsItem;

/// Name reported when every provider in the chain failed.
pub const SOURCE_NAME: &str = "news";

/// Tries providers in order until one answers.
///
/// Any error from a provider moves on to the next one. A provider that
/// answers with zero headlines ends the chain as `Empty`; it is a valid
/// answer, not a failure.
pub struct FallbackNewsSource {
    providers: Vec<Box<dyn NewsProvider>>,
}

impl std::fmt::Debug for FallbackNewsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("FallbackNewsSource")
            .field("providers", &names)
            .finish()
    }
}

impl FallbackNewsSource {
    #[must_use]
    pub fn new(providers: Vec<Box<dyn NewsProvider>>) -> Self {
        Self { providers }
    }

    /// Primary provider with a single fallback.
    pub fn with_fallback(
        primary: impl NewsProvider + 'static,
        secondary: impl NewsProvider + 'static,
    ) -> Self {
        Self::new(vec![Box::new(primary), Box::new(secondary)])
    }

    pub async fn fetch(&self, request: &NewsRequest) -> FetchOutcome<Vec<NewsItem>> {
        let mut failures: Vec<String> = Vec::new();

        for provider in &self.providers {
            if !provider.is_configured() {
                tracing::debug!(provider = provider.name(), "skipping news provider without API key");
                failures.push(format!("{}: no API key", provider.name()));
                continue;
            }

            match provider.fetch_headlines(request).await {
                Ok(mut items) => {
                    items.truncate(request.max_articles);
                    if items.is_empty() {
                        return FetchOutcome::Empty;
                    }
                    return FetchOutcome::Data(items);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        rate_limited = e.is_rate_limited(),
                        error = %e,
                        "news provider failed, trying next"
                    );
                    failures.push(format!("{}: {e}", provider.name()));
                }
            }
        }

        if failures.is_empty() {
            failures.push("no news providers configured".to_string());
        }
        FetchOutcome::failed(SOURCE_NAME, failures.join("; "))
    }
}
