//! Handlers for the backup/restore disaster-recovery cycle.
//!
//! The backup file is a snake_case snapshot of the whole vote store; the
//! admin UI downloads it as a JSON attachment and later posts it back to
//! `/restore`, which replaces the store wholesale and rebuilds every
//! tally.

use axum::extract::State;
use axum::http::header::CONTENT_DISPOSITION;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use ballotbox_core::types::{DbId, Timestamp};
use ballotbox_db::models::vote::{RestoreVote, Vote};
use ballotbox_db::repositories::VoteRepo;

use crate::error::{AppError, AppResult};
use crate::response::ApiMessage;
use crate::state::AppState;

/// Backup file format version.
const BACKUP_VERSION: &str = "1.0";

/// One vote row in the backup file (snake_case export format).
#[derive(Debug, Serialize)]
pub struct BackupVote {
    pub id: DbId,
    pub username: String,
    pub selected_options: Vec<String>,
    pub submit_time: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_deleted: bool,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

impl From<Vote> for BackupVote {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id,
            username: vote.username,
            selected_options: vote.selected_options.0,
            submit_time: vote.submit_time,
            ip_address: vote.ip_address,
            user_agent: vote.user_agent,
            is_deleted: vote.is_deleted,
            create_time: vote.create_time,
            update_time: vote.update_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BackupFile {
    pub timestamp: Timestamp,
    pub version: &'static str,
    pub database: String,
    pub votes: Vec<BackupVote>,
}

/// GET /backup
///
/// Download the full vote store as an attachment.
pub async fn download_backup(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let votes = VoteRepo::list_all(&state.pool, None).await?;
    let database = ballotbox_db::database_name(&state.pool).await?;

    let timestamp = Utc::now();
    let filename = format!("backup_{}.json", timestamp.format("%Y-%m-%dT%H-%M-%S"));

    let file = BackupFile {
        timestamp,
        version: BACKUP_VERSION,
        database,
        votes: votes.into_iter().map(BackupVote::from).collect(),
    };

    Ok((
        [(
            CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        )],
        Json(file),
    ))
}

/// POST /restore
///
/// Replace the entire vote store with the posted backup. The payload is
/// validated by hand so a malformed body gets the service's 400 envelope
/// rather than a framework rejection.
pub async fn restore_backup(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let votes_value = payload
        .get("votes")
        .ok_or_else(|| AppError::BadRequest("Invalid backup format: missing votes".to_string()))?;
    if !votes_value.is_array() {
        return Err(AppError::BadRequest(
            "Invalid backup format: votes must be an array".to_string(),
        ));
    }

    let records: Vec<RestoreVote> = serde_json::from_value(votes_value.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid backup format: {e}")))?;

    let restored = VoteRepo::restore(&state.pool, &records).await?;

    tracing::info!(restored, "Vote store restored from backup");

    Ok(Json(ApiMessage::new(format!(
        "Restored {restored} vote records"
    ))))
}
