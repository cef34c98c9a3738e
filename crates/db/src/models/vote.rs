//! Vote record model.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use ballotbox_core::options::SelectedOptionsInput;
use ballotbox_core::types::{DbId, Timestamp};

/// A row from the `votes` table: one user's submission.
///
/// Serializes camelCase, matching the admin/read wire format. The
/// `is_deleted` flag is written but never consulted by any read path; all
/// rows are treated as live.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: DbId,
    pub username: String,
    pub selected_options: Json<Vec<String>>,
    pub submit_time: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_deleted: bool,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

/// Input for a new vote, assembled server-side from the submit payload
/// plus request diagnostics.
#[derive(Debug)]
pub struct CreateVote {
    pub username: String,
    pub selected_options: Vec<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// One record from a backup file, as accepted by the restore endpoint.
///
/// Backup rows are snake_case (the export format), timestamps may be
/// absent in hand-edited or CSV-converted files, and `selected_options`
/// may be a JSON array, a JSON string, or a legacy comma-separated string.
/// `is_deleted` tolerates the numeric 0/1 form older exports used.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreVote {
    pub id: DbId,
    pub username: String,
    pub selected_options: SelectedOptionsInput,
    pub submit_time: Option<Timestamp>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_deleted: bool,
    pub create_time: Option<Timestamp>,
    pub update_time: Option<Timestamp>,
}

/// Accept `true`/`false`, `0`/`1`, or null for a boolean field.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    match Option::<BoolOrInt>::deserialize(deserializer)? {
        None => Ok(false),
        Some(BoolOrInt::Bool(b)) => Ok(b),
        Some(BoolOrInt::Int(i)) => Ok(i != 0),
    }
}
