use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{CreateSportRequest, SportResponse, UpdateSportRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a sport
///
/// POST /sports
#[instrument(name = "create_sport", skip(state, request))]
pub async fn create_sport(
    State(state): State<AppState>,
    Json(request): Json<CreateSportRequest>,
) -> Result<(StatusCode, Json<SportResponse>), AppError> {
    let sport = state.sport_service().create_sport(request).await?;
    Ok((StatusCode::CREATED, Json(sport)))
}

/// GET /sports
#[instrument(name = "list_sports", skip(state))]
pub async fn list_sports(
    State(state): State<AppState>,
) -> Result<Json<Vec<SportResponse>>, AppError> {
    let sports = state.sport_service().list_sports().await?;

    info!(sport_count = sports.len(), "Sports listed successfully");

    Ok(Json(sports))
}

/// GET /sports/:id
#[instrument(name = "get_sport", skip(state))]
pub async fn get_sport(
    State(state): State<AppState>,
    Path(sport_id): Path<String>,
) -> Result<Json<SportResponse>, AppError> {
    Ok(Json(state.sport_service().get_sport(&sport_id).await?))
}

/// PATCH /sports/:id
#[instrument(name = "update_sport", skip(state, request))]
pub async fn update_sport(
    State(state): State<AppState>,
    Path(sport_id): Path<String>,
    Json(request): Json<UpdateSportRequest>,
) -> Result<Json<SportResponse>, AppError> {
    let sport = state
        .sport_service()
        .update_sport(&sport_id, request)
        .await?;
    Ok(Json(sport))
}

/// DELETE /sports/:id
#[instrument(name = "delete_sport", skip(state))]
pub async fn delete_sport(
    State(state): State<AppState>,
    Path(sport_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.sport_service().delete_sport(&sport_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use crate::sport::{
        models::SportModel,
        repository::{InMemorySportRepository, SportRepository},
    };
    use crate::standings::ScoringConfig;
    use axum::{body::Body, http::Request, routing::get, Router};
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/sports", get(list_sports).post(create_sport))
            .route(
                "/sports/:id",
                get(get_sport).patch(update_sport).delete(delete_sport),
            )
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_sport_handler() {
        let app = app(AppStateBuilder::new().build());

        let request = json_request(
            "POST",
            "/sports",
            r#"{"name": "Chess960", "category": "BOARD_GAME",
                "classification_rules": {"points_for_win": 1.0, "points_for_draw": 0.5, "points_for_loss": 0.0}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let sport: SportResponse = body_json(response).await;
        assert_eq!(sport.name, "Chess960");
        assert_eq!(sport.classification_rules.points_for_draw, 0.5);
    }

    #[tokio::test]
    async fn test_create_duplicate_sport_conflicts() {
        let app = app(AppStateBuilder::new().build());
        let body = r#"{"name": "Padel"}"#;

        app.clone()
            .oneshot(json_request("POST", "/sports", body))
            .await
            .unwrap();
        let response = app
            .oneshot(json_request("POST", "/sports", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_and_delete_sport() {
        let sports = Arc::new(InMemorySportRepository::new());
        let sport = SportModel::new("Squash".to_string(), ScoringConfig::default());
        sports.create_sport(&sport).await.unwrap();
        let app = app(AppStateBuilder::new().with_sport_repository(sports).build());

        let get = Request::builder()
            .uri(format!("/sports/{}", sport.id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(get).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/sports/{}", sport.id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let get = Request::builder()
            .uri(format!("/sports/{}", sport.id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(get).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_sport_rejects_invalid_rules() {
        let sports = Arc::new(InMemorySportRepository::new());
        let sport = SportModel::new("Squash".to_string(), ScoringConfig::default());
        sports.create_sport(&sport).await.unwrap();
        let app = app(AppStateBuilder::new().with_sport_repository(sports).build());

        let request = json_request(
            "PATCH",
            &format!("/sports/{}", sport.id),
            r#"{"classification_rules": {"points_for_win": -1.0, "points_for_draw": 0.0, "points_for_loss": 0.0}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
