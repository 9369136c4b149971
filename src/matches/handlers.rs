use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{CreateMatchRequest, MatchResponse, RecordResultRequest, UpdateMatchRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for scheduling a match in a competition
///
/// POST /competitions/:id/matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
    Json(request): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), AppError> {
    let m = state
        .match_service()
        .create_match(&competition_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(m)))
}

/// GET /competitions/:id/matches
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
) -> Result<Json<Vec<MatchResponse>>, AppError> {
    let matches = state.match_service().list_matches(&competition_id).await?;

    info!(
        competition_id = %competition_id,
        match_count = matches.len(),
        "Matches listed successfully"
    );

    Ok(Json(matches))
}

/// GET /matches/:id
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchResponse>, AppError> {
    Ok(Json(state.match_service().get_match(&match_id).await?))
}

/// PATCH /matches/:id
#[instrument(name = "update_match", skip(state, request))]
pub async fn update_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<UpdateMatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let m = state
        .match_service()
        .update_match(&match_id, request)
        .await?;
    Ok(Json(m))
}

/// POST /matches/:id/result
#[instrument(name = "record_result", skip(state))]
pub async fn record_result(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let m = state
        .match_service()
        .record_result(&match_id, request.home_score, request.away_score)
        .await?;
    Ok(Json(m))
}

/// DELETE /matches/:id
#[instrument(name = "delete_match", skip(state))]
pub async fn delete_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.match_service().delete_match(&match_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
