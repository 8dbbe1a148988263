// src/analyze/mod.rs
//! Analysis pipeline entry: normalize → rules → aggregate → compose feedback.
//!
//! Pure and synchronous; the only side effect is a debug trace (never the
//! raw subject line).

pub mod feedback;
pub mod normalize;
pub mod rules;
pub mod scoring;

use serde::Serialize;
use tracing::debug;

use crate::config::ScoringConfig;

pub use crate::analyze::feedback::{classify, FeedbackItem, Severity};
pub use crate::analyze::normalize::{normalize, Normalized, RuleContext};
pub use crate::analyze::rules::{evaluate, RuleHit};
pub use crate::analyze::scoring::{aggregate, clamp_score};

/// How the pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Empty,
    OverLength,
    Scored,
}

/// Engine output before it gets an id and a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Trimmed input.
    pub subject_line: String,
    pub score: u8,
    pub feedback: Vec<String>,
    /// Rules that fired, in display order (empty for sentinels).
    pub hits: Vec<RuleHit>,
    pub outcome: Outcome,
}

pub fn analyze_subject_line(input: &str, cfg: &ScoringConfig) -> Analysis {
    let subject_line = input.trim().to_string();

    let ctx = match normalize(input, &cfg.limits) {
        Normalized::Empty => {
            return sentinel(subject_line, Outcome::Empty, &[feedback::MSG_EMPTY]);
        }
        Normalized::OverLength { chars, words } => {
            debug!(target: "analyze", chars, words, "over-length subject short-circuited");
            return sentinel(subject_line, Outcome::OverLength, &feedback::MSG_OVER_LENGTH);
        }
        Normalized::Ready(ctx) => ctx,
    };

    let hits = evaluate(&ctx, cfg);
    let score = aggregate(cfg.base_score, hits.iter().map(|h| h.delta));
    let feedback = feedback::compose(&hits, score, &cfg.verdict);

    debug!(
        target: "analyze",
        score,
        rules = hits.len(),
        chars = ctx.length,
        words = ctx.word_count,
        "subject scored"
    );

    Analysis {
        subject_line,
        score,
        feedback,
        hits,
        outcome: Outcome::Scored,
    }
}

fn sentinel(subject_line: String, outcome: Outcome, lines: &[&str]) -> Analysis {
    Analysis {
        subject_line,
        score: 0,
        feedback: lines.iter().map(|s| s.to_string()).collect(),
        hits: Vec::new(),
        outcome,
    }
}
