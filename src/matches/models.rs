use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::standings::MatchResult;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Finished,
    Cancelled,
    Postponed,
}

/// Database model for matches table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: String, // UUID v4 as string
    pub competition_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>, // Set together with away_score
    pub away_score: Option<i32>,
    pub status: MatchStatus,
    pub scheduled_at: DateTime<Utc>,
    pub played_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchModel {
    /// Creates a scheduled match with no result
    pub fn new(
        competition_id: String,
        home_team: String,
        away_team: String,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            competition_id,
            home_team,
            away_team,
            home_score: None,
            away_score: None,
            status: MatchStatus::default(),
            scheduled_at,
            played_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Only a match with both scores counts towards standings
    pub fn is_played(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn result(&self) -> Option<MatchResult> {
        match (self.home_score, self.away_score) {
            (Some(home_score), Some(away_score)) => Some(MatchResult::new(
                self.id.as_str(),
                self.home_team.as_str(),
                self.away_team.as_str(),
                home_score,
                away_score,
            )),
            _ => None,
        }
    }

    /// Stores the final score and marks the match finished
    pub fn record_result(&mut self, home_score: i32, away_score: i32) {
        let now = Utc::now();
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.status = MatchStatus::Finished;
        self.played_at = Some(now);
        self.updated_at = now;
    }

    pub fn clear_result(&mut self) {
        self.home_score = None;
        self.away_score = None;
        self.played_at = None;
        if self.status == MatchStatus::Finished {
            self.status = MatchStatus::Scheduled;
        }
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
