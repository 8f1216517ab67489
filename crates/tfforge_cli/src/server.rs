//! HTTP front-end for the synthesis pipeline.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Serialize;
use thiserror::Error;
use tokio::task::{self, JoinError};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, warn};

use tfforge_iac::{IacError, Synthesizer, VariantSummary};

use crate::page;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub synth: Arc<Synthesizer>,
}

impl AppState {
    pub fn new(synth: Synthesizer) -> Self {
        Self {
            synth: Arc::new(synth),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VariantsResponse {
    pub variants: Vec<VariantSummary>,
}

/// Synthesis failure mapped onto an HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Synthesis(#[from] IacError),

    #[error("Synthesis task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Synthesis(e) if e.is_caller_error() => {
                warn!("Rejected submission: {}", e);
                StatusCode::BAD_REQUEST
            }
            _ => {
                error!("Synthesis error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Build the router: landing page, form endpoint and registry listing.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/generate", post(generate))
        .route("/api/variants", get(list_variants))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// POST /generate
///
/// Synthesis writes the output file under the writer's lock, so it runs on
/// the blocking pool.
async fn generate(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let synth = Arc::clone(&state.synth);
    let report = task::spawn_blocking(move || synth.synthesize(&fields)).await??;
    Ok(Html(page::success_page(&report)))
}

/// GET /api/variants
async fn list_variants(State(state): State<AppState>) -> Json<VariantsResponse> {
    let variants = state
        .synth
        .registry()
        .list()
        .iter()
        .map(|v| v.summary())
        .collect();

    Json(VariantsResponse { variants })
}
