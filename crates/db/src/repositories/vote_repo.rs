//! Repository for the `votes` table.
//!
//! Every mutation here keeps the denormalized `vote_options.vote_count`
//! column consistent with the vote rows inside a single transaction: a
//! record's old contribution is unwound (floored decrements) before its
//! new contribution is applied, so the aggregate never observes a vote
//! counted twice or not at all. The transaction is the only concurrency
//! mechanism; the `uq_votes_username` constraint backstops the duplicate
//! check under concurrent submits.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;

use ballotbox_core::types::DbId;

use crate::models::vote::{CreateVote, RestoreVote, Vote};

/// Column list for votes queries.
const COLUMNS: &str = "id, username, selected_options, submit_time, ip_address, \
    user_agent, is_deleted, create_time, update_time";

/// Provides transactional CRUD operations for vote records.
pub struct VoteRepo;

impl VoteRepo {
    /// Submit a new vote.
    ///
    /// Returns `Ok(None)` if the username has already voted (checked
    /// inside the transaction; the unique constraint catches the
    /// concurrent race as a 23505). Each selected option's tally is
    /// incremented in the same transaction; unknown option texts are
    /// silent no-ops.
    pub async fn submit(pool: &PgPool, input: &CreateVote) -> Result<Option<Vote>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM votes WHERE username = $1")
                .bind(&input.username)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO votes (username, selected_options, ip_address, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let vote = sqlx::query_as::<_, Vote>(&query)
            .bind(&input.username)
            .bind(Json(&input.selected_options))
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .fetch_one(&mut *tx)
            .await?;

        for option in &input.selected_options {
            sqlx::query(
                "UPDATE vote_options SET vote_count = vote_count + 1 WHERE option_text = $1",
            )
            .bind(option)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(vote))
    }

    /// Update a vote's username and option set, returning the updated row
    /// or `None` if the id does not exist.
    ///
    /// `submit_time` and the capture-time diagnostics are frozen; only
    /// `update_time` moves. The old option set is decremented (floored at
    /// zero) and the new set incremented, restricted to currently active
    /// options so a retired option's tally is not resurrected.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        username: &str,
        selected_options: &[String],
    ) -> Result<Option<Vote>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the row so concurrent edits of the same record serialize
        // around the counter unwind.
        let old: Option<Json<Vec<String>>> =
            sqlx::query_scalar("SELECT selected_options FROM votes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(Json(old_options)) = old else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE votes
             SET username = $2, selected_options = $3, update_time = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let vote = sqlx::query_as::<_, Vote>(&query)
            .bind(id)
            .bind(username)
            .bind(Json(selected_options))
            .fetch_one(&mut *tx)
            .await?;

        for option in &old_options {
            sqlx::query(
                "UPDATE vote_options SET vote_count = GREATEST(vote_count - 1, 0)
                 WHERE option_text = $1",
            )
            .bind(option)
            .execute(&mut *tx)
            .await?;
        }

        for option in selected_options {
            sqlx::query(
                "UPDATE vote_options SET vote_count = vote_count + 1
                 WHERE option_text = $1 AND is_active",
            )
            .bind(option)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(vote))
    }

    /// Delete a vote by id, unwinding its tally contributions. Returns
    /// `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old: Option<Json<Vec<String>>> =
            sqlx::query_scalar("SELECT selected_options FROM votes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(Json(old_options)) = old else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for option in &old_options {
            sqlx::query(
                "UPDATE vote_options SET vote_count = GREATEST(vote_count - 1, 0)
                 WHERE option_text = $1",
            )
            .bind(option)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Replace the entire vote store with the supplied backup records and
    /// rebuild every tally from scratch. Returns the number of restored
    /// records.
    ///
    /// Ids and timestamps are preserved as supplied (missing timestamps
    /// fall back to `submit_time`, then to now). Input usernames are not
    /// re-validated for duplicates; a backup that genuinely violates the
    /// unique constraint aborts the transaction, retaining the prior
    /// state. Tally replay counts active options only.
    pub async fn restore(pool: &PgPool, records: &[RestoreVote]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM votes").execute(&mut *tx).await?;

        let mut option_sets: Vec<Vec<String>> = Vec::with_capacity(records.len());
        for record in records {
            let options = match record.selected_options.parse() {
                Ok(options) => options,
                Err(error) => {
                    tracing::warn!(
                        id = record.id,
                        %error,
                        "Unparseable option list in backup record; storing empty set"
                    );
                    Vec::new()
                }
            };

            let now = Utc::now();
            let submit_time = record.submit_time.unwrap_or(now);
            let create_time = record.create_time.or(record.submit_time).unwrap_or(now);
            let update_time = record.update_time.or(record.submit_time).unwrap_or(now);

            sqlx::query(
                "INSERT INTO votes
                    (id, username, selected_options, submit_time, ip_address,
                     user_agent, is_deleted, create_time, update_time)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(record.id)
            .bind(&record.username)
            .bind(Json(&options))
            .bind(submit_time)
            .bind(&record.ip_address)
            .bind(&record.user_agent)
            .bind(record.is_deleted)
            .bind(create_time)
            .bind(update_time)
            .execute(&mut *tx)
            .await?;

            option_sets.push(options);
        }

        sqlx::query("UPDATE vote_options SET vote_count = 0")
            .execute(&mut *tx)
            .await?;

        for options in &option_sets {
            for option in options {
                sqlx::query(
                    "UPDATE vote_options SET vote_count = vote_count + 1
                     WHERE option_text = $1 AND is_active",
                )
                .bind(option)
                .execute(&mut *tx)
                .await?;
            }
        }

        // Keep the id sequence ahead of the restored ids so subsequent
        // submits don't collide.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('votes', 'id'),
                    COALESCE((SELECT MAX(id) FROM votes), 0) + 1, false)",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(records.len() as u64)
    }

    /// Delete every vote and zero every tally. Returns the number of
    /// deleted records.
    pub async fn clear_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM votes")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("UPDATE vote_options SET vote_count = 0")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }

    /// Find a vote by username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Vote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM votes WHERE username = $1");
        sqlx::query_as::<_, Vote>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Whether a vote exists for this username.
    pub async fn has_voted(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM votes WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// List all votes, newest first, optionally filtered by a
    /// case-insensitive substring over username and the option list.
    pub async fn list_all(
        pool: &PgPool,
        filter: Option<&str>,
    ) -> Result<Vec<Vote>, sqlx::Error> {
        if let Some(filter) = filter {
            let pattern = format!("%{filter}%");
            let query = format!(
                "SELECT {COLUMNS} FROM votes
                 WHERE username ILIKE $1 OR selected_options::text ILIKE $1
                 ORDER BY submit_time DESC"
            );
            sqlx::query_as::<_, Vote>(&query)
                .bind(&pattern)
                .fetch_all(pool)
                .await
        } else {
            let query = format!("SELECT {COLUMNS} FROM votes ORDER BY submit_time DESC");
            sqlx::query_as::<_, Vote>(&query).fetch_all(pool).await
        }
    }

    /// Number of vote records (equals the number of distinct voters,
    /// given the unique username constraint).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(pool)
            .await
    }
}
