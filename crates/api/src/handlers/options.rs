//! Handler for the public option catalog.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use ballotbox_core::types::{DbId, Timestamp};
use ballotbox_db::repositories::VoteOptionRepo;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OptionItem {
    pub id: DbId,
    pub text: String,
    pub order: i32,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub success: bool,
    pub options: Vec<OptionItem>,
    pub timestamp: Timestamp,
}

/// GET /options
///
/// Active options in display order, as rendered by the public form.
pub async fn list_options(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let options = VoteOptionRepo::list_active(&state.pool).await?;

    Ok(Json(OptionsResponse {
        success: true,
        options: options
            .into_iter()
            .map(|o| OptionItem {
                id: o.id,
                text: o.option_text,
                order: o.option_order,
            })
            .collect(),
        timestamp: Utc::now(),
    }))
}
