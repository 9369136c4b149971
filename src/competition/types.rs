use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{CompetitionFormat, CompetitionModel, CompetitionStatus};
use crate::standings::ScoringConfig;

/// Request payload for creating a competition
#[derive(Debug, Deserialize)]
pub struct CreateCompetitionRequest {
    pub name: String,
    pub description: Option<String>,
    pub sport_id: String,
    pub format: Option<CompetitionFormat>,
    pub max_teams: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub custom_scoring: Option<ScoringConfig>,
    pub is_public: Option<bool>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompetitionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sport_id: Option<String>,
    pub format: Option<CompetitionFormat>,
    pub max_teams: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub custom_scoring: Option<ScoringConfig>,
    /// Drops the override so the sport's rules apply again
    #[serde(default)]
    pub clear_custom_scoring: bool,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: CompetitionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompetitionResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sport_id: String,
    pub format: CompetitionFormat,
    pub status: CompetitionStatus,
    pub max_teams: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub custom_scoring: Option<ScoringConfig>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompetitionModel> for CompetitionResponse {
    fn from(c: CompetitionModel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            sport_id: c.sport_id,
            format: c.format,
            status: c.status,
            max_teams: c.max_teams,
            start_date: c.start_date,
            end_date: c.end_date,
            custom_scoring: c.custom_scoring,
            is_public: c.is_public,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
