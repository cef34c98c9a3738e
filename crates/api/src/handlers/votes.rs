//! Handlers for vote submission, lookup, listing, editing, and deletion.

use axum::extract::{Path, Query, State};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use ballotbox_core::error::CoreError;
use ballotbox_core::options::SelectedOptionsInput;
use ballotbox_core::types::{DbId, Timestamp};
use ballotbox_core::votes::{validate_selected_options, validate_username};
use ballotbox_db::models::vote::{CreateVote, Vote};
use ballotbox_db::repositories::VoteRepo;

use crate::error::{AppError, AppResult};
use crate::response::ApiMessage;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response payloads
// ---------------------------------------------------------------------------

/// Body for POST /api/votes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteRequest {
    pub username: String,
    pub selected_options: Vec<String>,
}

/// Body for PUT /api/votes/{id}. The option list tolerates the legacy
/// serialized forms (JSON string, comma-separated string).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVoteRequest {
    pub username: String,
    pub selected_options: SelectedOptionsInput,
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize)]
pub struct ListVotesParams {
    /// Case-insensitive substring filter over username and options.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitVoteResponse {
    pub success: bool,
    pub id: DbId,
    pub message: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckVoteResponse {
    pub has_voted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote: Option<CheckVoteDetail>,
}

/// The subset of a vote record the public form needs to render the
/// "already submitted" view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckVoteDetail {
    pub id: DbId,
    pub username: String,
    pub selected_options: Vec<String>,
    pub submit_time: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct ListVotesResponse {
    pub success: bool,
    pub votes: Vec<Vote>,
    pub total: usize,
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /votes
///
/// Submit a new vote. Exactly one submission per username: a duplicate
/// fails with 409 whether it loses to the in-transaction check or to the
/// unique constraint under a concurrent race.
pub async fn submit_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SubmitVoteRequest>,
) -> AppResult<impl IntoResponse> {
    validate_username(&input.username).map_err(AppError::BadRequest)?;
    validate_selected_options(&input.selected_options).map_err(AppError::BadRequest)?;

    let create = CreateVote {
        username: input.username,
        selected_options: input.selected_options,
        ip_address: client_ip(&headers),
        user_agent: header_string(&headers, USER_AGENT.as_str()),
    };

    let vote = VoteRepo::submit(&state.pool, &create)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "User has already voted; each user may vote only once".to_string(),
            ))
        })?;

    tracing::info!(
        vote_id = vote.id,
        username = %vote.username,
        options = vote.selected_options.0.len(),
        "Vote submitted"
    );

    Ok(Json(SubmitVoteResponse {
        success: true,
        id: vote.id,
        message: "Vote submitted".to_string(),
        timestamp: Utc::now(),
    }))
}

/// GET /votes/check/{username}
///
/// Whether this username has already voted, with the stored submission
/// when it has.
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let vote = VoteRepo::find_by_username(&state.pool, &username).await?;

    Ok(Json(CheckVoteResponse {
        has_voted: vote.is_some(),
        vote: vote.map(|v| CheckVoteDetail {
            id: v.id,
            username: v.username,
            selected_options: v.selected_options.0,
            submit_time: v.submit_time,
        }),
    }))
}

/// GET /votes?q=
///
/// List all vote records, newest first, optionally filtered for the
/// admin search box.
pub async fn list_votes(
    State(state): State<AppState>,
    Query(params): Query<ListVotesParams>,
) -> AppResult<impl IntoResponse> {
    let votes = VoteRepo::list_all(&state.pool, params.q.as_deref()).await?;
    let total = votes.len();

    Ok(Json(ListVotesResponse {
        success: true,
        votes,
        total,
        timestamp: Utc::now(),
    }))
}

/// PUT /votes/{id}
///
/// Admin edit of username and option set. Submission time and capture
/// diagnostics stay frozen; tallies are unwound and reapplied in the
/// same transaction.
pub async fn update_vote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVoteRequest>,
) -> AppResult<impl IntoResponse> {
    validate_username(&input.username).map_err(AppError::BadRequest)?;

    let selected_options = input.selected_options.parse().map_err(AppError::BadRequest)?;
    validate_selected_options(&selected_options).map_err(AppError::BadRequest)?;

    let vote = VoteRepo::update(&state.pool, id, &input.username, &selected_options)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Vote", id }))?;

    tracing::info!(vote_id = vote.id, username = %vote.username, "Vote record updated");

    Ok(Json(ApiMessage::new("Vote record updated")))
}

/// DELETE /votes/{id}
///
/// Remove a vote record (admin action, also the self-service "clear my
/// data" path), unwinding its tally contributions.
pub async fn delete_vote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = VoteRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Vote", id }));
    }

    tracing::info!(vote_id = id, "Vote record deleted");

    Ok(Json(ApiMessage::new("Vote record deleted")))
}

// ---------------------------------------------------------------------------
// Request diagnostics
// ---------------------------------------------------------------------------

/// Best-effort client address: first `x-forwarded-for` hop, then
/// `x-real-ip`. Absent headers store NULL.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = header_string(headers, "x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    header_string(headers, "x-real-ip")
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
