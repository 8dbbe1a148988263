//! history.rs — bounded, newest-first list of past analyses, flushed to a
//! `KeyValueStore` on every mutation.
//!
//! Invariants: at most `HISTORY_CAP` entries, newest first. The in-memory
//! list only changes after the store accepted the new value.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analyze::scoring::MAX_SCORE;
use crate::metrics;
use crate::record::AnalysisResult;
use crate::store::KeyValueStore;

pub const HISTORY_KEY: &str = "pastAnalyses";
pub const HISTORY_CAP: usize = 10;

#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
    entries: Vec<AnalysisResult>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Read the persisted list. Missing, unreadable or malformed data gives an
    /// empty history; this never fails.
    pub fn load(store: S) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<AnalysisResult>>(&raw) {
                Ok(list) if list.iter().any(|e| e.score > MAX_SCORE) => {
                    warn!("discarding history with out-of-range scores");
                    Vec::new()
                }
                Ok(mut list) => {
                    list.truncate(HISTORY_CAP);
                    list
                }
                Err(e) => {
                    warn!(error = %e, "discarding malformed history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = ?e, "history unreadable; starting empty");
                Vec::new()
            }
        };
        info!(entries = entries.len(), "history loaded");
        metrics::history_changed(entries.len(), 0);
        Self { store, entries }
    }

    /// Prepend and evict beyond the cap.
    pub fn append(&mut self, result: AnalysisResult) -> Result<()> {
        let mut next = Vec::with_capacity(HISTORY_CAP);
        next.push(result);
        next.extend(self.entries.iter().take(HISTORY_CAP - 1).cloned());

        self.persist(&next)?;
        let evicted = (self.entries.len() + 1).saturating_sub(next.len());
        self.entries = next;
        metrics::history_changed(self.entries.len(), evicted);
        Ok(())
    }

    /// Drop the entry with `id`. Returns `false` (and writes nothing) when
    /// there is no such entry.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if !self.entries.iter().any(|e| e.id == id) {
            return Ok(false);
        }
        let next: Vec<AnalysisResult> = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();

        self.persist(&next)?;
        self.entries = next;
        metrics::history_changed(self.entries.len(), 0);
        Ok(true)
    }

    /// Empty the list and erase the persisted key.
    pub fn clear(&mut self) -> Result<()> {
        self.store
            .remove(HISTORY_KEY)
            .context("removing persisted history")?;
        self.entries.clear();
        info!("history cleared");
        metrics::history_changed(0, 0);
        Ok(())
    }

    pub fn entries(&self) -> &[AnalysisResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self, list: &[AnalysisResult]) -> Result<()> {
        let json = serde_json::to_string(list).context("serializing history")?;
        self.store
            .set(HISTORY_KEY, &json)
            .context("persisting history")
    }
}
