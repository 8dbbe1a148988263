pub mod scoring;
pub mod service;

pub use scoring::{HotReloadScoring, KeywordRule, ScoringConfig};
pub use service::ServiceConfig;
