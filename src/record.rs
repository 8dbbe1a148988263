//! record.rs — persisted analysis record and the view handed to the UI.

use serde::{Deserialize, Serialize};

use crate::analyze::feedback::{annotate, tips_for, FeedbackItem};
use crate::analyze::Analysis;
use crate::config::scoring::VerdictThresholds;

/// One scored subject line as stored in history. Immutable once created.
///
/// The JSON shape (camelCase) is what the history key holds; all five
/// fields must survive a round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub subject_line: String,
    pub score: u8,
    pub feedback: Vec<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl AnalysisResult {
    pub fn from_analysis(analysis: Analysis, id: String, timestamp: i64) -> Self {
        Self {
            id,
            subject_line: analysis.subject_line,
            score: analysis.score,
            feedback: analysis.feedback,
            timestamp,
        }
    }
}

/// Per-analysis payload for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub id: String,
    pub subject_line: String,
    pub score: u8,
    pub timestamp: i64,
    pub feedback: Vec<FeedbackItem>,
    /// Generic advice for low scores; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

impl AnalysisView {
    pub fn new(result: &AnalysisResult, thresholds: &VerdictThresholds) -> Self {
        Self {
            id: result.id.clone(),
            subject_line: result.subject_line.clone(),
            score: result.score,
            timestamp: result.timestamp,
            feedback: annotate(result.feedback.as_slice()),
            tips: tips_for(result.score, thresholds),
        }
    }
}
