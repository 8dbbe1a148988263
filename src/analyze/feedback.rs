//! Feedback composition: summary verdict, display severity, improvement tips.
//!
//! Severity is derived from wording alone and never feeds back into scoring.

use serde::{Deserialize, Serialize};

use super::rules::RuleHit;
use crate::config::scoring::VerdictThresholds;

pub const MSG_EMPTY: &str = "Please enter a subject line.";

pub const MSG_OVER_LENGTH: [&str; 3] = [
    "This subject line is unusually long for an email subject.",
    "Consider shortening it to 40–60 characters so it displays fully in most inboxes.",
    "Try to focus on the key message you want recipients to act on.",
];

pub const VERDICT_EXCELLENT: &str =
    "Excellent subject line! It effectively uses multiple best practices for email marketing.";
pub const VERDICT_GOOD: &str =
    "Good subject line. Consider the feedback above to potentially improve its effectiveness further.";
pub const VERDICT_IMPROVE: &str =
    "This subject line has room for improvement. Review the suggestions above to strengthen it.";

/// Shown alongside results that score below the "good" threshold.
pub const IMPROVEMENT_TIPS: [&str; 6] = [
    "Aim for 30-60 characters",
    "Use urgency words like \"limited\" or \"exclusive\" if appropriate",
    "Include a clear call to action",
    "Consider personalization with {name} or {company}",
    "Ensure proper capitalization",
    "Try incorporating numbers or asking a question",
];

const POSITIVE: &[&str] = &["good", "effective", "optimal"];
const SUGGESTION: &[&str] = &["consider", "try", "could"];
const WARNING: &[&str] = &["caution", "avoid", "too long", "too short"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Suggestion,
    Warning,
    Info,
}

/// A feedback line as the UI renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub text: String,
    pub severity: Severity,
}

/// Case-insensitive substring match; first matching group wins.
pub fn classify(line: &str) -> Severity {
    let l = line.to_lowercase();
    let has_any = |needles: &[&str]| needles.iter().any(|n| l.contains(n));
    if has_any(POSITIVE) {
        Severity::Positive
    } else if has_any(SUGGESTION) {
        Severity::Suggestion
    } else if has_any(WARNING) {
        Severity::Warning
    } else {
        Severity::Info
    }
}

pub fn verdict(score: u8, t: &VerdictThresholds) -> &'static str {
    if score >= t.excellent {
        VERDICT_EXCELLENT
    } else if score >= t.good {
        VERDICT_GOOD
    } else {
        VERDICT_IMPROVE
    }
}

/// Rule messages in evaluation order, then exactly one verdict.
pub fn compose(hits: &[RuleHit], score: u8, t: &VerdictThresholds) -> Vec<String> {
    let mut lines: Vec<String> = hits.iter().map(|h| h.message.clone()).collect();
    lines.push(verdict(score, t).to_string());
    lines
}

pub fn annotate<S: AsRef<str>>(lines: &[S]) -> Vec<FeedbackItem> {
    lines
        .iter()
        .map(|l| FeedbackItem {
            text: l.as_ref().to_string(),
            severity: classify(l.as_ref()),
        })
        .collect()
}

pub fn tips_for(score: u8, t: &VerdictThresholds) -> Vec<String> {
    if score < t.good {
        IMPROVEMENT_TIPS.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    }
}
