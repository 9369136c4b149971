use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{AddTeamRequest, StandingsResponse};
use crate::shared::{AppError, AppState};

/// GET /competitions/:id/standings
#[instrument(name = "get_standings", skip(state))]
pub async fn get_standings(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
) -> Result<Json<StandingsResponse>, AppError> {
    let rows = state.standings_service.standings(&competition_id).await?;

    info!(competition_id = %competition_id, rows = rows.len(), "Standings listed");

    Ok(Json(StandingsResponse::from_rows(&competition_id, rows)))
}

/// POST /competitions/:id/standings/recompute
#[instrument(name = "recompute_standings", skip(state))]
pub async fn recompute_standings(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
) -> Result<Json<StandingsResponse>, AppError> {
    let table = state.standings_service.recompute(&competition_id).await?;
    Ok(Json(table.into()))
}

/// POST /competitions/:id/teams
///
/// Registers the team and returns the recomputed table
#[instrument(name = "add_team", skip(state))]
pub async fn add_team(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
    Json(request): Json<AddTeamRequest>,
) -> Result<(StatusCode, Json<StandingsResponse>), AppError> {
    let table = state
        .standings_service
        .add_team(&competition_id, &request.team_name)
        .await?;

    Ok((StatusCode::CREATED, Json(table.into())))
}

/// DELETE /competitions/:id/teams/:team
#[instrument(name = "remove_team", skip(state))]
pub async fn remove_team(
    State(state): State<AppState>,
    Path((competition_id, team)): Path<(String, String)>,
) -> Result<Json<StandingsResponse>, AppError> {
    let table = state
        .standings_service
        .remove_team(&competition_id, &team)
        .await?;

    Ok(Json(table.into()))
}
