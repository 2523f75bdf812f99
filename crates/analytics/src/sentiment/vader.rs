//! VADER polarity through the `vader_sentiment` crate.

use super::{PolarityAnalyzer, SentimentError};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Uses VADER's normalized `compound` score, already in [-1, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderPolarity;

impl VaderPolarity {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PolarityAnalyzer for VaderPolarity {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        let analyzer = SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .ok_or_else(|| SentimentError::Analyzer("VADER returned no compound score".to_string()))
    }
}
