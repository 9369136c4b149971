use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::standings::ScoringConfig;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionFormat {
    #[default]
    League,
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Custom,
    CasualMatch,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionStatus {
    #[default]
    Draft,
    RegistrationOpen,
    InProgress,
    Finished,
    Cancelled,
}

/// Database model for competitions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub description: Option<String>,
    pub sport_id: String,
    pub format: CompetitionFormat,
    pub status: CompetitionStatus,
    pub max_teams: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub custom_scoring: Option<ScoringConfig>, // Overrides the sport's rules when set
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompetitionModel {
    /// Creates a public draft league with generated ID and timestamps
    pub fn new(name: String, sport_id: String, start_date: DateTime<Utc>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description: None,
            sport_id,
            format: CompetitionFormat::default(),
            status: CompetitionStatus::default(),
            max_teams: None,
            start_date,
            end_date: None,
            custom_scoring: None,
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_competition_defaults() {
        let competition = CompetitionModel::new("Cup".to_string(), "s1".to_string(), Utc::now());

        assert_eq!(competition.format, CompetitionFormat::League);
        assert_eq!(competition.status, CompetitionStatus::Draft);
        assert!(competition.is_public);
        assert!(competition.custom_scoring.is_none());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(CompetitionStatus::RegistrationOpen.to_string(), "REGISTRATION_OPEN");
        assert_eq!(
            CompetitionFormat::from_str("SINGLE_ELIMINATION").unwrap(),
            CompetitionFormat::SingleElimination
        );
    }
}
