// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod history;
pub mod metrics;
pub mod record;
pub mod session;
pub mod store;

// Scoring pipeline (normalize, rules, scoring, feedback)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{analyze_subject_line, Analysis, Outcome};
pub use crate::api::{create_router, AppState};
pub use crate::config::{ScoringConfig, ServiceConfig};
pub use crate::history::{HistoryStore, HISTORY_CAP, HISTORY_KEY};
pub use crate::record::{AnalysisResult, AnalysisView};
pub use crate::session::Session;
pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
