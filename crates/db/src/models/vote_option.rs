//! Vote option model.

use serde::Serialize;
use sqlx::FromRow;

use ballotbox_core::types::DbId;

/// A row from the `vote_options` table.
///
/// The option catalog (`option_text`, `option_order`, `is_active`) is
/// seeded by migration and managed out-of-band; this service only ever
/// mutates `vote_count`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VoteOption {
    pub id: DbId,
    pub option_text: String,
    pub option_order: i32,
    pub is_active: bool,
    pub vote_count: i64,
}

/// A per-option tally read off the denormalized `vote_count` column.
#[derive(Debug, Clone, FromRow)]
pub struct OptionTally {
    pub option_text: String,
    pub vote_count: i64,
}
