//! Connectivity probe and debug endpoints for the admin surface.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use ballotbox_core::types::Timestamp;
use ballotbox_db::models::vote_option::VoteOption;
use ballotbox_db::repositories::{VoteOptionRepo, VoteRepo};

use crate::error::AppResult;
use crate::response::ApiMessage;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TestConnectionResponse {
    pub success: bool,
    pub message: String,
    pub database: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct OptionStateResponse {
    pub success: bool,
    pub options: Vec<VoteOption>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct RawOptionsResponse {
    pub success: bool,
    pub options: Vec<VoteOption>,
    pub count: usize,
    pub timestamp: Timestamp,
}

/// GET /test
///
/// Database connectivity probe for the frontend, which falls back to
/// local-storage mode when the store is unreachable.
pub async fn test_connection(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    ballotbox_db::health_check(&state.pool).await?;
    let database = ballotbox_db::database_name(&state.pool).await?;

    Ok(Json(TestConnectionResponse {
        success: true,
        message: "Database connection OK".to_string(),
        database,
        timestamp: Utc::now(),
    }))
}

/// DELETE /debug/clear
///
/// Wipe every vote record and zero every tally.
pub async fn clear_votes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let deleted = VoteRepo::clear_all(&state.pool).await?;

    tracing::info!(deleted, "All vote data cleared");

    Ok(Json(ApiMessage::new("All vote data cleared")))
}

/// GET /debug/options
///
/// Full option catalog with tallies, in display order.
pub async fn option_state(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let options = VoteOptionRepo::list_all(&state.pool).await?;

    Ok(Json(OptionStateResponse {
        success: true,
        options,
        timestamp: Utc::now(),
    }))
}

/// GET /debug/vote-options
///
/// Raw catalog rows in id order.
pub async fn raw_options(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let options = VoteOptionRepo::list_by_id(&state.pool).await?;
    let count = options.len();

    Ok(Json(RawOptionsResponse {
        success: true,
        options,
        count,
        timestamp: Utc::now(),
    }))
}
