use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{
    CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest, UpdateStatusRequest,
};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a competition
///
/// POST /competitions
#[instrument(name = "create_competition", skip(state, request))]
pub async fn create_competition(
    State(state): State<AppState>,
    Json(request): Json<CreateCompetitionRequest>,
) -> Result<(StatusCode, Json<CompetitionResponse>), AppError> {
    let competition = state
        .competition_service()
        .create_competition(request)
        .await?;
    Ok((StatusCode::CREATED, Json(competition)))
}

/// GET /competitions
#[instrument(name = "list_competitions", skip(state))]
pub async fn list_competitions(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompetitionResponse>>, AppError> {
    let competitions = state.competition_service().list_competitions().await?;

    info!(
        competition_count = competitions.len(),
        "Competitions listed successfully"
    );

    Ok(Json(competitions))
}

/// GET /competitions/:id
#[instrument(name = "get_competition", skip(state))]
pub async fn get_competition(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = state
        .competition_service()
        .get_competition(&competition_id)
        .await?;
    Ok(Json(competition))
}

/// PATCH /competitions/:id
#[instrument(name = "update_competition", skip(state, request))]
pub async fn update_competition(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
    Json(request): Json<UpdateCompetitionRequest>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = state
        .competition_service()
        .update_competition(&competition_id, request)
        .await?;
    Ok(Json(competition))
}

/// PATCH /competitions/:id/status
#[instrument(name = "update_competition_status", skip(state))]
pub async fn update_competition_status(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = state
        .competition_service()
        .update_status(&competition_id, request.status)
        .await?;
    Ok(Json(competition))
}

/// DELETE /competitions/:id
#[instrument(name = "delete_competition", skip(state))]
pub async fn delete_competition(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .competition_service()
        .delete_competition(&competition_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::models::CompetitionStatus;
    use crate::shared::test_utils::AppStateBuilder;
    use crate::sport::{models::SportModel, repository::SportRepository};
    use crate::standings::ScoringConfig;
    use axum::{body::Body, http::Request, routing::get, routing::patch, Router};
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/competitions",
                get(list_competitions).post(create_competition),
            )
            .route(
                "/competitions/:id",
                get(get_competition)
                    .patch(update_competition)
                    .delete(delete_competition),
            )
            .route("/competitions/:id/status", patch(update_competition_status))
            .with_state(state)
    }

    async fn state_with_sport() -> (AppState, String) {
        let state = AppStateBuilder::new().build();
        let sport = SportModel::new("Football".to_string(), ScoringConfig::default());
        state.sport_repository.create_sport(&sport).await.unwrap();
        (state, sport.id)
    }

    fn json_request(method: &str, uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn create(app: &Router, sport_id: &str) -> CompetitionResponse {
        let body = format!(
            r#"{{"name": "Spring Cup", "sport_id": "{}", "start_date": "2026-03-01T10:00:00Z", "format": "ROUND_ROBIN"}}"#,
            sport_id
        );
        let response = app
            .clone()
            .oneshot(json_request("POST", "/competitions", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_create_and_get_competition() {
        let (state, sport_id) = state_with_sport().await;
        let app = app(state);

        let created = create(&app, &sport_id).await;
        assert_eq!(created.status, CompetitionStatus::Draft);

        let request = Request::builder()
            .uri(format!("/competitions/{}", created.id))
            .body(Body::empty())
            .unwrap();
        let fetched: CompetitionResponse = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_status_change_handler() {
        let (state, sport_id) = state_with_sport().await;
        let app = app(state);
        let created = create(&app, &sport_id).await;

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/competitions/{}/status", created.id),
                r#"{"status": "REGISTRATION_OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let updated: CompetitionResponse = body_json(response).await;
        assert_eq!(updated.status, CompetitionStatus::RegistrationOpen);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (state, sport_id) = state_with_sport().await;
        let app = app(state);
        let created = create(&app, &sport_id).await;

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/competitions/{}/status", created.id),
                r#"{"status": "ABANDONED"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_delete_competition_handler() {
        let (state, sport_id) = state_with_sport().await;
        let app = app(state);
        let created = create(&app, &sport_id).await;

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/competitions/{}", created.id))
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(delete).await.unwrap().status(),
            StatusCode::NO_CONTENT
        );

        let get = Request::builder()
            .uri(format!("/competitions/{}", created.id))
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.oneshot(get).await.unwrap().status(),
            StatusCode::NOT_FOUND
        );
    }
}
