//! Integration tests for the backup/restore cycle.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn backup_downloads_snake_case_snapshot(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/votes",
        serde_json::json!({"username": "alice", "selectedOptions": ["Red", "Blue"]}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/backup").await;
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get("content-disposition")
        .expect("backup must be served as an attachment")
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=backup_"));
    assert!(disposition.ends_with(".json"));

    let json = body_json(response).await;
    assert_eq!(json["version"], "1.0");
    assert!(json["database"].is_string());
    assert!(json["timestamp"].is_string());

    // Backup rows use the snake_case export format.
    let vote = &json["votes"][0];
    assert_eq!(vote["username"], "alice");
    assert_eq!(vote["selected_options"][0], "Red");
    assert!(vote["submit_time"].is_string());
    assert!(vote.get("submitTime").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn backup_restore_round_trip(pool: PgPool) {
    for (name, options) in [("alice", vec!["Red", "Blue"]), ("bob", vec!["Blue"])] {
        let app = common::build_test_app(pool.clone());
        post_json(
            app,
            "/api/votes",
            serde_json::json!({"username": name, "selectedOptions": options}),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let backup = body_json(get(app, "/api/backup").await).await;

    // Wipe everything, then restore from the downloaded file.
    let app = common::build_test_app(pool.clone());
    delete(app, "/api/debug/clear").await;

    let app = common::build_test_app(pool.clone());
    let stats = body_json(get(app, "/api/statistics").await).await;
    assert_eq!(stats["voterCount"], 0);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/restore",
        serde_json::json!({"votes": backup["votes"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let app = common::build_test_app(pool.clone());
    let stats = body_json(get(app, "/api/statistics").await).await;
    assert_eq!(stats["voterCount"], 2);
    assert_eq!(stats["optionCounts"]["Blue"], 2);
    assert_eq!(stats["optionCounts"]["Red"], 1);
    assert_eq!(stats["totalVotes"], 3);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/votes/check/alice").await).await;
    assert_eq!(json["hasVoted"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn restore_without_votes_key_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/restore", serde_json::json!({"records": []})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn restore_with_non_array_votes_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/restore",
        serde_json::json!({"votes": "not-an-array"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn restore_with_duplicate_usernames_conflicts_and_rolls_back(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/votes",
        serde_json::json!({"username": "survivor", "selectedOptions": ["Green"]}),
    )
    .await;

    // The storage constraint rejects true duplicates; the prior state
    // must survive the rolled-back restore.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/restore",
        serde_json::json!({"votes": [
            {"id": 1, "username": "dupe", "selected_options": ["Red"]},
            {"id": 2, "username": "dupe", "selected_options": ["Blue"]}
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/votes/check/survivor").await).await;
    assert_eq!(json["hasVoted"], true);
}
