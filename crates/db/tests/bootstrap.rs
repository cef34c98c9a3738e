//! Schema bootstrap tests: connect, migrate, verify tables and seed data.

use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn full_bootstrap(pool: PgPool) {
    ballotbox_db::health_check(&pool).await.unwrap();

    for table in ["votes", "vote_options", "system_config"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 >= 0);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn option_catalog_seeded(pool: PgPool) {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vote_options")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(count > 0, "vote_options should have seed data, got 0 rows");

    // Every seeded option starts active with a zero tally.
    let nonzero: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM vote_options WHERE vote_count <> 0 OR NOT is_active",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(nonzero, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn username_unique_constraint_present(pool: PgPool) {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(
            SELECT 1 FROM pg_constraint
            WHERE conname = 'uq_votes_username' AND contype = 'u'
        )",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(exists, "votes.username must carry the uq_votes_username constraint");
}
