//! Sentiment classification over free text.
//!
//! A [`SentimentClassifier`] owns one [`SentimentStrategy`] chosen at startup:
//! either a lexicon scorer producing a compound polarity in `[-1, 1]`, or a
//! keyword/emoji counting heuristic producing a confidence in `[0, 1]`.
//! Both paths are pure functions of the input text.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SentimentMode;

/// Compound scores at or above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Compound scores at or below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Substrings counted as positive by the keyword heuristic.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "happy", "great", "awesome", "love", "good", "😊", ":)", "😀", "😄", "😎", "👍",
];

/// Substrings counted as negative by the keyword heuristic.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "sad", "bad", "terrible", "hate", "angry", "😢", ":(", "😭", "😡", "😞", "👎",
];

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
}

impl SentimentResult {
    fn neutral(score: f64) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score,
        }
    }
}

/// Produces a compound polarity score in `[-1, 1]` for a piece of text.
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// VADER lexicon scorer.
#[cfg(feature = "lexicon")]
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

#[cfg(feature = "lexicon")]
impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

/// How text is turned into a [`SentimentResult`].
#[derive(Clone)]
pub enum SentimentStrategy {
    Lexicon(Arc<dyn PolarityScorer>),
    Keywords,
}

impl SentimentStrategy {
    /// Picks the strategy for `mode`, falling back to keywords when the
    /// lexicon was not compiled in.
    pub fn select(mode: SentimentMode) -> Self {
        match mode {
            #[cfg(feature = "lexicon")]
            SentimentMode::Lexicon => SentimentStrategy::Lexicon(Arc::new(VaderScorer)),
            #[cfg(not(feature = "lexicon"))]
            SentimentMode::Lexicon => {
                warn!("lexicon analyzer unavailable, using keyword heuristic");
                SentimentStrategy::Keywords
            }
            SentimentMode::Keywords => {
                warn!("keyword heuristic selected for sentiment");
                SentimentStrategy::Keywords
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SentimentStrategy::Lexicon(_) => "lexicon",
            SentimentStrategy::Keywords => "keywords",
        }
    }
}

impl std::fmt::Debug for SentimentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    strategy: SentimentStrategy,
}

impl SentimentClassifier {
    pub fn new(strategy: SentimentStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &SentimentStrategy {
        &self.strategy
    }

    /// Classifies `text`. Blank input is always neutral with score `0.0`.
    pub fn classify(&self, text: &str) -> SentimentResult {
        let text = text.trim();
        if text.is_empty() {
            return SentimentResult::neutral(0.0);
        }
        let result = match &self.strategy {
            SentimentStrategy::Lexicon(scorer) => from_compound(scorer.compound(text)),
            SentimentStrategy::Keywords => keyword_heuristic(text),
        };
        debug!(strategy = self.strategy.name(), ?result, "classified text");
        result
    }
}

/// Rounds a compound score to four decimals, then labels the rounded value.
pub fn from_compound(compound: f64) -> SentimentResult {
    let score = round4(compound);
    let label = if score >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    SentimentResult { label, score }
}

/// Rounds the exact decimal value of `x`, so `0.52755` (stored just below
/// the tie) becomes `0.5275`.
fn round4(x: f64) -> f64 {
    // `+ 0.0` turns a rounded `-0.0` into `0.0`.
    format!("{x:.4}").parse::<f64>().unwrap_or(x) + 0.0
}

/// Counts keyword hits as literal substrings of the lowercased text.
///
/// Matching is not word-bounded, so "badge" counts as "bad".
pub fn keyword_heuristic(text: &str) -> SentimentResult {
    let lower = text.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();
    let p = hits(POSITIVE_KEYWORDS);
    let n = hits(NEGATIVE_KEYWORDS);
    let confidence = |margin: usize| (0.6 + 0.1 * margin as f64).min(1.0);
    if p > n {
        SentimentResult {
            label: SentimentLabel::Positive,
            score: confidence(p - n),
        }
    } else if n > p {
        SentimentResult {
            label: SentimentLabel::Negative,
            score: confidence(n - p),
        }
    } else {
        SentimentResult::neutral(0.5)
    }
}
