//! Match analysis endpoints.
//!
//! `POST /api/analysis/match` takes a full match payload and returns the
//! derived stats bundle. Structural problems in the payload come back as
//! 422 with the offending field named in the message, so feed operators
//! can tell a bad export from a service fault.

use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::ingest;
use crate::models::{MatchRecord, MatchStatsBundle};

pub async fn analyze_match(
    State(state): State<AppState>,
    Json(record): Json<MatchRecord>,
) -> Result<Json<MatchStatsBundle>, ApiError> {
    let bundle = state.engine.process_match_stats(&record)?;
    Ok(Json(bundle))
}

/// Analyze the built-in sample match. Handy as a smoke check and as a
/// live example of the response shape.
pub async fn analyze_sample(
    State(state): State<AppState>,
) -> Result<Json<MatchStatsBundle>, ApiError> {
    let bundle = state.engine.process_match_stats(&ingest::sample_match())?;
    Ok(Json(bundle))
}
