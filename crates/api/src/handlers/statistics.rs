//! Handler for aggregate vote statistics.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

use ballotbox_core::types::Timestamp;
use ballotbox_db::repositories::{VoteOptionRepo, VoteRepo};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub success: bool,
    /// Sum of all option tallies: option-selections, not voters. A voter
    /// who picked three options contributes three here.
    pub total_votes: i64,
    /// Number of vote records (distinct usernames).
    pub voter_count: i64,
    /// Per-option tallies, most-voted first.
    pub option_counts: IndexMap<String, i64>,
    pub timestamp: Timestamp,
}

/// GET /statistics
///
/// Tallies are read straight off the denormalized `vote_count` column,
/// never recomputed from vote rows.
pub async fn get_statistics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let voter_count = VoteRepo::count(&state.pool).await?;
    let tallies = VoteOptionRepo::tallies(&state.pool).await?;

    let mut option_counts = IndexMap::with_capacity(tallies.len());
    let mut total_votes = 0;
    for tally in tallies {
        total_votes += tally.vote_count;
        option_counts.insert(tally.option_text, tally.vote_count);
    }

    Ok(Json(StatisticsResponse {
        success: true,
        total_votes,
        voter_count,
        option_counts,
        timestamp: Utc::now(),
    }))
}
