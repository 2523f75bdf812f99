//! Headline sentiment scoring.
//!
//! A [`PolarityAnalyzer`] produces a raw signed score; [`SentimentScorer`]
//! clamps it, buckets it into a [`SentimentLabel`] and absorbs analyzer
//! faults as neutral.

pub mod lexicon;
pub mod vader;

pub use lexicon::LexiconPolarity;
pub use vader::VaderPolarity;

use market_pulse_data::NewsItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SentimentError {
    #[error("Analyzer failed: {0}")]
    Analyzer(String),
}

/// Maps text to a polarity in roughly [-1, 1].
pub trait PolarityAnalyzer: Send + Sync {
    /// # Errors
    /// Implementation-specific; callers treat any error as neutral
    fn polarity(&self, text: &str) -> Result<f64, SentimentError>;
}

impl<A: PolarityAnalyzer + ?Sized> PolarityAnalyzer for Box<A> {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        (**self).polarity(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Self::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub label: SentimentLabel,
}

impl SentimentResult {
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }

    fn from_score(score: f64) -> Self {
        let score = score.clamp(-1.0, 1.0);
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentimentScorer<A = LexiconPolarity> {
    analyzer: A,
}

impl Default for SentimentScorer<LexiconPolarity> {
    fn default() -> Self {
        Self::new(LexiconPolarity::new())
    }
}

impl<A: PolarityAnalyzer> SentimentScorer<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Scores `text`. Never fails: empty text, analyzer errors and non-finite
    /// scores all come back as `{0, Neutral}`.
    pub fn score_text(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        match self.analyzer.polarity(text) {
            Ok(score) if score.is_finite() => SentimentResult::from_score(score),
            Ok(score) => {
                tracing::debug!(score, "analyzer returned non-finite polarity, treating as neutral");
                SentimentResult::neutral()
            }
            Err(e) => {
                tracing::debug!(error = %e, "polarity analysis failed, treating as neutral");
                SentimentResult::neutral()
            }
        }
    }

    /// Scores each headline's title.
    pub fn score_headlines(&self, items: &[NewsItem]) -> Vec<ScoredHeadline> {
        items
            .iter()
            .map(|item| ScoredHeadline {
                item: item.clone(),
                sentiment: self.score_text(&item.title),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub item: NewsItem,
    pub sentiment: SentimentResult,
}

/// Label counts and mean score across a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// `None` for an empty batch.
    pub mean_score: Option<f64>,
}

impl SentimentSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_scores<'a>(results: impl IntoIterator<Item = &'a SentimentResult>) -> Self {
        let mut summary = Self::default();
        let mut total = 0.0;
        for result in results {
            total += result.score;
            match result.label {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
                SentimentLabel::Negative => summary.negative += 1,
            }
        }
        let count = summary.total();
        if count > 0 {
            summary.mean_score = Some(total / count as f64);
        }
        summary
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Label of the mean score, if any.
    #[must_use]
    pub fn overall(&self) -> Option<SentimentLabel> {
        self.mean_score.map(SentimentLabel::from_score)
    }
}
