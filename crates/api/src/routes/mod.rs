pub mod health;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /votes                      list (GET, ?q= filter), submit (POST)
/// /votes/check/{username}     has-this-user-voted lookup
/// /votes/{id}                 admin edit (PUT), delete (DELETE)
/// /options                    active option catalog
/// /statistics                 aggregate tallies
/// /backup                     download full store as JSON attachment
/// /restore                    replace store from a backup (POST)
/// /test                       database connectivity probe
/// /debug/clear                wipe votes + tallies (DELETE)
/// /debug/options              catalog with tallies, display order
/// /debug/vote-options         raw catalog rows, id order
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/votes",
            get(handlers::votes::list_votes).post(handlers::votes::submit_vote),
        )
        .route(
            "/votes/check/{username}",
            get(handlers::votes::check_username),
        )
        .route(
            "/votes/{id}",
            put(handlers::votes::update_vote).delete(handlers::votes::delete_vote),
        )
        .route("/options", get(handlers::options::list_options))
        .route("/statistics", get(handlers::statistics::get_statistics))
        .route("/backup", get(handlers::backup::download_backup))
        .route("/restore", post(handlers::backup::restore_backup))
        .route("/test", get(handlers::debug::test_connection))
        .route("/debug/clear", delete(handlers::debug::clear_votes))
        .route("/debug/options", get(handlers::debug::option_state))
        .route("/debug/vote-options", get(handlers::debug::raw_options))
}
