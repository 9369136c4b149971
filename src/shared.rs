use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::competition::repository::{
    CompetitionRepository, InMemoryCompetitionRepository, PostgresCompetitionRepository,
};
use crate::competition::service::CompetitionService;
use crate::matches::repository::{
    InMemoryMatchRepository, MatchRepository, PostgresMatchRepository,
};
use crate::matches::service::MatchService;
use crate::sport::repository::{InMemorySportRepository, PostgresSportRepository, SportRepository};
use crate::sport::service::SportService;
use crate::standings::repository::{
    InMemoryStandingsRepository, PostgresStandingsRepository, StandingsRepository,
};
use crate::standings::{StandingsError, StandingsService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub sport_repository: Arc<dyn SportRepository>,
    pub competition_repository: Arc<dyn CompetitionRepository>,
    pub match_repository: Arc<dyn MatchRepository>,
    pub standings_repository: Arc<dyn StandingsRepository>,
    /// Shared so every request goes through the same per-competition locks
    pub standings_service: Arc<StandingsService>,
}

impl AppState {
    pub fn new(
        sport_repository: Arc<dyn SportRepository>,
        competition_repository: Arc<dyn CompetitionRepository>,
        match_repository: Arc<dyn MatchRepository>,
        standings_repository: Arc<dyn StandingsRepository>,
    ) -> Self {
        let standings_service = Arc::new(StandingsService::new(
            Arc::clone(&standings_repository),
            Arc::clone(&match_repository),
            Arc::clone(&competition_repository),
            Arc::clone(&sport_repository),
        ));

        Self {
            sport_repository,
            competition_repository,
            match_repository,
            standings_repository,
            standings_service,
        }
    }

    /// State backed entirely by in-memory repositories (development and tests)
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemorySportRepository::new()),
            Arc::new(InMemoryCompetitionRepository::new()),
            Arc::new(InMemoryMatchRepository::new()),
            Arc::new(InMemoryStandingsRepository::new()),
        )
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PostgresSportRepository::new(pool.clone())),
            Arc::new(PostgresCompetitionRepository::new(pool.clone())),
            Arc::new(PostgresMatchRepository::new(pool.clone())),
            Arc::new(PostgresStandingsRepository::new(pool)),
        )
    }

    pub fn sport_service(&self) -> SportService {
        SportService::new(
            Arc::clone(&self.sport_repository),
            Arc::clone(&self.competition_repository),
            Arc::clone(&self.standings_service),
        )
    }

    pub fn competition_service(&self) -> CompetitionService {
        CompetitionService::new(
            Arc::clone(&self.competition_repository),
            Arc::clone(&self.sport_repository),
            Arc::clone(&self.match_repository),
            Arc::clone(&self.standings_service),
        )
    }

    pub fn match_service(&self) -> MatchService {
        MatchService::new(
            Arc::clone(&self.match_repository),
            Arc::clone(&self.competition_repository),
            Arc::clone(&self.standings_service),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

/// Maps a failed query: unique violations become conflicts, anything else a database error
pub fn database_error(e: sqlx::Error) -> AppError {
    const UNIQUE_VIOLATION: &str = "23505";

    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AppError::Conflict(db_err.message().to_string());
        }
    }

    warn!(error = %e, "Database query failed");
    AppError::DatabaseError(e.to_string())
}

impl From<StandingsError> for AppError {
    fn from(err: StandingsError) -> Self {
        match err {
            StandingsError::CompetitionNotFound(_) | StandingsError::TeamNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            StandingsError::TeamAlreadyRegistered { .. } | StandingsError::CompetitionFull(_) => {
                AppError::Conflict(err.to_string())
            }
            StandingsError::InvalidScoringConfig(_) | StandingsError::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            StandingsError::MissingScoringConfig(_) => AppError::Internal,
            StandingsError::Repository(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
