use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),

    #[error("No scoring configuration available for competition {0}")]
    MissingScoringConfig(String),

    #[error("Invalid scoring configuration: {0}")]
    InvalidScoringConfig(String),

    #[error("Team {team} is already registered in competition {competition_id}")]
    TeamAlreadyRegistered { competition_id: String, team: String },

    #[error("Team {team} is not registered in competition {competition_id}")]
    TeamNotFound { competition_id: String, team: String },

    #[error("Competition {0} has reached its team limit")]
    CompetitionFull(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<AppError> for StandingsError {
    fn from(err: AppError) -> Self {
        StandingsError::Repository(err.to_string())
    }
}
