//! Repository for the `vote_options` table.
//!
//! Read-only from this service's perspective except for `vote_count`,
//! which is mutated exclusively by [`VoteRepo`](crate::repositories::VoteRepo)
//! transactions.

use sqlx::PgPool;

use crate::models::vote_option::{OptionTally, VoteOption};

/// Column list for vote_options queries.
const COLUMNS: &str = "id, option_text, option_order, is_active, vote_count";

/// Provides catalog and tally reads for vote options.
pub struct VoteOptionRepo;

impl VoteOptionRepo {
    /// List active options in display order (the public form's catalog).
    pub async fn list_active(pool: &PgPool) -> Result<Vec<VoteOption>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vote_options
             WHERE is_active
             ORDER BY option_order ASC"
        );
        sqlx::query_as::<_, VoteOption>(&query).fetch_all(pool).await
    }

    /// List the full catalog (active and retired) in display order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<VoteOption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vote_options ORDER BY option_order ASC");
        sqlx::query_as::<_, VoteOption>(&query).fetch_all(pool).await
    }

    /// List the raw catalog rows in id order.
    pub async fn list_by_id(pool: &PgPool) -> Result<Vec<VoteOption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vote_options ORDER BY id ASC");
        sqlx::query_as::<_, VoteOption>(&query).fetch_all(pool).await
    }

    /// Per-option tallies off the denormalized counter, most-voted first.
    /// Never recomputed from vote rows.
    pub async fn tallies(pool: &PgPool) -> Result<Vec<OptionTally>, sqlx::Error> {
        sqlx::query_as::<_, OptionTally>(
            "SELECT option_text, vote_count FROM vote_options ORDER BY vote_count DESC",
        )
        .fetch_all(pool)
        .await
    }
}
