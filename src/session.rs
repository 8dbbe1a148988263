//! Session-scoped state: the history, the "analysis in flight" flag and the
//! id/timestamp counters. One `Session` per running service; callers pass it
//! by reference instead of reaching for globals.

use anyhow::Result;
use chrono::Utc;

use crate::analyze::{analyze_subject_line, Outcome};
use crate::config::ScoringConfig;
use crate::history::HistoryStore;
use crate::metrics;
use crate::record::AnalysisResult;
use crate::store::KeyValueStore;

#[derive(Debug)]
pub struct Session<S> {
    history: HistoryStore<S>,
    analyzing: bool,
    last_timestamp: i64,
    sequence: u64,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            history,
            analyzing: false,
            last_timestamp: 0,
            sequence: 0,
        }
    }

    /// Load history from `store` and start a fresh session.
    pub fn open(store: S) -> Self {
        Self::new(HistoryStore::load(store))
    }

    /// Claim the single in-flight slot. `false` if an analysis is pending.
    pub fn begin(&mut self) -> bool {
        if self.analyzing {
            return false;
        }
        self.analyzing = true;
        true
    }

    pub fn finish(&mut self) {
        self.analyzing = false;
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Score `raw`, stamp it and record it in history.
    pub fn analyze(&mut self, raw: &str, cfg: &ScoringConfig) -> Result<AnalysisResult> {
        self.analyze_at(raw, cfg, Utc::now().timestamp_millis())
    }

    /// Same as `analyze` with an explicit clock reading (ms since epoch).
    pub fn analyze_at(
        &mut self,
        raw: &str,
        cfg: &ScoringConfig,
        now_ms: i64,
    ) -> Result<AnalysisResult> {
        let analysis = analyze_subject_line(raw, cfg);
        metrics::analysis_recorded(analysis.outcome != Outcome::Scored);

        let timestamp = now_ms.max(self.last_timestamp);
        self.last_timestamp = timestamp;
        self.sequence += 1;
        let id = format!("{timestamp}-{}", self.sequence);

        let result = AnalysisResult::from_analysis(analysis, id, timestamp);
        self.history.append(result.clone())?;
        Ok(result)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.history.remove(id)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.history.clear()
    }

    pub fn history(&self) -> &[AnalysisResult] {
        self.history.entries()
    }
}
