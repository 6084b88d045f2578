//! Resonance scoring
//!
//! A file's resonance is the cosine similarity of its word multiset with the
//! reference text's. Without a reference, any text that yields tokens
//! resonates fully with itself.

pub mod tokenizer;

pub use tokenizer::{cosine_similarity, tokenize, TokenCounts};

use crate::models::FileStatus;
use tracing::trace;

pub const TRACE_EMPTY_INPUT: &str = "Input text is empty.";
pub const TRACE_WITH_REFERENCE: &str = "Resonance calculated using provided reference text.";
pub const TRACE_SELF_RESONANCE: &str =
    "No reference text provided, falling back to self-resonance.";

/// Score, status and trace for one text
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub status: FileStatus,
    pub trace: String,
}

impl ScoreOutcome {
    fn ok(score: f64, trace: &str) -> Self {
        Self {
            score,
            status: FileStatus::Ok,
            trace: trace.to_string(),
        }
    }

    fn error(status: FileStatus, trace: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            status,
            trace: trace.into(),
        }
    }
}

/// Scorer bound to one reference text, tokenized once per run
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    reference: Option<TokenCounts>,
}

impl ScoringEngine {
    /// An empty reference text selects the self-resonance fallback
    pub fn new(reference_text: &str) -> Self {
        let reference = (!reference_text.is_empty()).then(|| tokenize(reference_text));
        Self { reference }
    }

    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Score `text`. `seed` only feeds companion behaviour and never changes
    /// the score.
    pub fn score(&self, text: &str, seed: u64) -> ScoreOutcome {
        trace!("Scoring {} bytes with companion seed {}", text.len(), seed);

        if text.is_empty() {
            return ScoreOutcome::error(FileStatus::IoError, TRACE_EMPTY_INPUT);
        }

        let tokens = tokenize(text);
        let outcome = match &self.reference {
            None => {
                let score = if tokens.is_empty() { 0.0 } else { 1.0 };
                ScoreOutcome::ok(score, TRACE_SELF_RESONANCE)
            }
            Some(reference) => {
                ScoreOutcome::ok(cosine_similarity(&tokens, reference), TRACE_WITH_REFERENCE)
            }
        };

        if !outcome.score.is_finite() {
            return ScoreOutcome::error(
                FileStatus::CalcError,
                format!("Calculation error: non-finite score {}", outcome.score),
            );
        }

        // rounding can push an exact match a hair past 1.0
        ScoreOutcome {
            score: outcome.score.clamp(0.0, 1.0),
            ..outcome
        }
    }
}

/// Score `text` against `reference`; an empty reference means none
pub fn score(text: &str, reference: &str, seed: u64) -> ScoreOutcome {
    ScoringEngine::new(reference).score(text, seed)
}
