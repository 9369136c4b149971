use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{MatchModel, MatchStatus};

/// Request payload for scheduling a match, optionally already played
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub home_team: String,
    pub away_team: String,
    /// Defaults to the time of the request
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<MatchStatus>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub notes: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMatchRequest {
    pub competition_id: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<MatchStatus>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub notes: Option<String>,
    /// Removes both scores so the match stops counting
    #[serde(default)]
    pub clear_result: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub home_score: i32,
    pub away_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResponse {
    pub id: String,
    pub competition_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: MatchStatus,
    pub scheduled_at: DateTime<Utc>,
    pub played_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MatchModel> for MatchResponse {
    fn from(m: MatchModel) -> Self {
        Self {
            id: m.id,
            competition_id: m.competition_id,
            home_team: m.home_team,
            away_team: m.away_team,
            home_score: m.home_score,
            away_score: m.away_score,
            status: m.status,
            scheduled_at: m.scheduled_at,
            played_at: m.played_at,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
