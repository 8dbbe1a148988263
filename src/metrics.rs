use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!("subject_analyses_total", "Subject lines analyzed.");
        describe_counter!(
            "subject_analyses_rejected_total",
            "Analyses short-circuited as empty or over-length."
        );
        describe_counter!(
            "history_evictions_total",
            "Oldest history entries dropped to respect the cap."
        );
        describe_gauge!("history_entries", "Entries currently held in history.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

// No-ops until a recorder is installed (tests, library use).

pub(crate) fn analysis_recorded(rejected: bool) {
    counter!("subject_analyses_total").increment(1);
    if rejected {
        counter!("subject_analyses_rejected_total").increment(1);
    }
}

pub(crate) fn history_changed(len: usize, evicted: usize) {
    gauge!("history_entries").set(len as f64);
    if evicted > 0 {
        counter!("history_evictions_total").increment(evicted as u64);
    }
}
