use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::scoring::{HotReloadScoring, ScoringConfig};
use crate::config::ServiceConfig;
use crate::record::{AnalysisResult, AnalysisView};
use crate::session::Session;
use crate::store::{DynStore, FileStore, MemoryStore};

pub type SharedSession = Arc<Mutex<Session<DynStore>>>;

#[derive(Clone)]
pub struct AppState {
    session: SharedSession,
    scoring: Arc<HotReloadScoring>,
    delay: Duration,
}

impl AppState {
    pub fn new(session: Session<DynStore>, scoring: HotReloadScoring, delay: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            scoring: Arc::new(scoring),
            delay,
        }
    }

    /// In-memory history, fixed scoring table, no simulated delay.
    pub fn in_memory(config: ScoringConfig) -> Self {
        let store: DynStore = Box::new(MemoryStore::new());
        Self::new(
            Session::open(store),
            HotReloadScoring::fixed(config),
            Duration::ZERO,
        )
    }

    /// Wire the state from service settings plus the scoring file lookup.
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let store: DynStore = match &cfg.history_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "file-backed history");
                Box::new(FileStore::new(dir))
            }
            None => {
                info!("in-memory history");
                Box::new(MemoryStore::new())
            }
        };

        let scoring = HotReloadScoring::load_default()?;

        Ok(Self::new(Session::open(store), scoring, cfg.analyze_delay))
    }

    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }
}

fn lock(session: &SharedSession) -> MutexGuard<'_, Session<DynStore>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the in-flight slot; released on drop, including when the request
/// future is cancelled mid-delay.
struct InFlight {
    session: SharedSession,
}

impl InFlight {
    fn claim(session: &SharedSession) -> Option<Self> {
        lock(session).begin().then(|| Self {
            session: session.clone(),
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.session).finish();
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/history", get(history).delete(clear_history))
        .route("/history/{id}", delete(delete_entry))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReq {
    #[serde(alias = "text")]
    subject_line: String,
}

enum ApiError {
    Busy,
    Storage(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Busy => {
                (StatusCode::CONFLICT, "analysis already in progress").into_response()
            }
            ApiError::Storage(e) => {
                error!(error = ?e, "history storage failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "history storage failed").into_response()
            }
        }
    }
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Result<Json<AnalysisView>, ApiError> {
    let _slot = InFlight::claim(&state.session).ok_or(ApiError::Busy)?;

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let cfg = state.scoring.current();
    let result = lock(&state.session)
        .analyze(&body.subject_line, &cfg)
        .map_err(ApiError::Storage)?;

    Ok(Json(AnalysisView::new(&result, &cfg.verdict)))
}

async fn history(State(state): State<AppState>) -> Json<Vec<AnalysisResult>> {
    Json(lock(&state.session).history().to_vec())
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    lock(&state.session)
        .delete(&id)
        .map_err(ApiError::Storage)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    lock(&state.session).clear().map_err(ApiError::Storage)?;
    Ok(StatusCode::NO_CONTENT)
}
