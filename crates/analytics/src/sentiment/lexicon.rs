//! Word-list polarity for business headlines.

use super::{PolarityAnalyzer, SentimentError};
use std::collections::HashMap;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("rally", 0.7),
    ("soar", 0.8),
    ("jump", 0.6),
    ("gain", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("up", 0.3),
    ("increase", 0.5),
    ("improve", 0.5),
    ("outperform", 0.7),
    ("beat", 0.6),
    ("exceed", 0.6),
    ("strong", 0.5),
    ("robust", 0.6),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("confident", 0.5),
    ("record", 0.6),
    ("high", 0.4),
    ("upgrade", 0.6),
    ("buy", 0.5),
    ("boost", 0.6),
    ("breakout", 0.6),
    ("momentum", 0.4),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("success", 0.6),
    ("win", 0.6),
    ("expand", 0.4),
    ("approve", 0.4),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("plunge", -0.8),
    ("slump", -0.7),
    ("tumble", -0.7),
    ("drop", -0.6),
    ("fall", -0.5),
    ("slip", -0.4),
    ("decline", -0.6),
    ("loss", -0.6),
    ("down", -0.4),
    ("decrease", -0.5),
    ("weak", -0.5),
    ("negative", -0.5),
    ("pessimistic", -0.6),
    ("concern", -0.5),
    ("worry", -0.5),
    ("fear", -0.6),
    ("risk", -0.4),
    ("volatile", -0.3),
    ("uncertainty", -0.5),
    ("miss", -0.6),
    ("disappoint", -0.7),
    ("underperform", -0.6),
    ("downgrade", -0.6),
    ("sell", -0.5),
    ("selloff", -0.7),
    ("dump", -0.7),
    ("correction", -0.4),
    ("crisis", -0.8),
    ("warning", -0.5),
    ("trouble", -0.6),
    ("problem", -0.5),
    ("fail", -0.7),
    ("fraud", -0.9),
    ("probe", -0.4),
    ("penalty", -0.5),
    ("default", -0.7),
    ("bad", -0.7),
    ("worst", -1.0),
    ("low", -0.3),
    ("cut", -0.4),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "cannot", "cant", "don't", "dont",
    "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt", "aren't", "arent",
    "wasn't", "wasnt", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("dramatically", 1.5),
    ("massively", 1.5),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("marginally", 0.5),
];

const SUFFIXES: &[&str] = &["ing", "ed", "es", "s", "d"];

/// Lexical polarity: the mean score of the sentiment-bearing words in a text.
///
/// A preceding intensifier scales the next scored word. A preceding negation
/// flips it and halves its weight. Text with no scored words is 0.
#[derive(Debug, Clone)]
pub struct LexiconPolarity {
    words: HashMap<String, f64>,
    negations: Vec<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconPolarity {
    #[must_use]
    pub fn new() -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|&(w, s)| (w.to_string(), s))
            .collect();
        let negations = NEGATIONS.iter().map(|w| (*w).to_string()).collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|&(w, m)| (w.to_string(), m))
            .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Adds or replaces a scored word.
    #[must_use]
    pub fn with_word(mut self, word: &str, score: f64) -> Self {
        self.words.insert(word.to_lowercase(), score);
        self
    }

    /// Score for a word, trying common inflections ("gains", "surged", "falling").
    #[must_use]
    pub fn word_score(&self, word: &str) -> Option<f64> {
        if let Some(score) = self.words.get(word) {
            return Some(*score);
        }
        SUFFIXES.iter().find_map(|suffix| {
            let stem = word.strip_suffix(suffix)?;
            if stem.len() < 2 {
                return None;
            }
            self.words
                .get(stem)
                .or_else(|| self.words.get(&format!("{stem}e")))
                .copied()
        })
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Mean polarity of `text`, clamped to [-1, 1].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn analyze(&self, text: &str) -> f64 {
        let mut scores: Vec<f64> = Vec::new();
        let mut negate_next = false;
        let mut intensifier = 1.0;

        for token in Self::tokens(text) {
            if self.is_negation(&token) {
                negate_next = true;
                continue;
            }
            if let Some(mult) = self.intensifiers.get(&token) {
                intensifier = *mult;
                continue;
            }
            if let Some(mut score) = self.word_score(&token) {
                if negate_next {
                    score *= -0.5;
                    negate_next = false;
                }
                score *= intensifier;
                intensifier = 1.0;
                scores.push(score);
            }
        }

        if scores.is_empty() {
            return 0.0;
        }
        (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
    }
}

impl PolarityAnalyzer for LexiconPolarity {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        Ok(self.analyze(text))
    }
}
