use axum::{
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::{competition, matches, shared::AppState, sport, standings};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full HTTP API over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sports", get(sport::list_sports).post(sport::create_sport))
        .route(
            "/sports/:id",
            get(sport::get_sport)
                .patch(sport::update_sport)
                .delete(sport::delete_sport),
        )
        .route(
            "/competitions",
            get(competition::list_competitions).post(competition::create_competition),
        )
        .route(
            "/competitions/:id",
            get(competition::get_competition)
                .patch(competition::update_competition)
                .delete(competition::delete_competition),
        )
        .route(
            "/competitions/:id/status",
            patch(competition::update_competition_status),
        )
        .route(
            "/competitions/:id/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/competitions/:id/standings",
            get(standings::get_standings),
        )
        .route(
            "/competitions/:id/standings/recompute",
            post(standings::recompute_standings),
        )
        .route("/competitions/:id/teams", post(standings::add_team))
        .route(
            "/competitions/:id/teams/:team",
            delete(standings::remove_team),
        )
        .route(
            "/matches/:id",
            get(matches::get_match)
                .patch(matches::update_match)
                .delete(matches::delete_match),
        )
        .route("/matches/:id/result", post(matches::record_result))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
