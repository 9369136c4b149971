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
pub enum ActivityCategory {
    #[default]
    Sport,
    Esport,
    BoardGame,
    TabletopRpg,
    CardGame,
    Other,
}

/// Database model for sports table (a sport or any other activity type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub description: Option<String>,
    pub category: ActivityCategory,
    pub is_custom: bool, // false for the built-in catalogue
    pub classification_rules: ScoringConfig,
    pub tracked_metrics: Vec<String>, // Informational, shown by clients
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SportModel {
    /// Creates a user-defined sport with generated ID and timestamps
    pub fn new(name: String, classification_rules: ScoringConfig) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description: None,
            category: ActivityCategory::default(),
            is_custom: true,
            classification_rules,
            tracked_metrics: default_metrics(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub fn default_metrics() -> Vec<String> {
    ["wins", "draws", "losses", "points", "goals_for", "goals_against"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_sport_model() {
        let sport = SportModel::new("Handball".to_string(), ScoringConfig::default());

        assert!(!sport.id.is_empty());
        assert!(sport.is_custom);
        assert_eq!(sport.category, ActivityCategory::Sport);
        assert_eq!(sport.classification_rules.points_for_win, 3.0);
    }

    #[test]
    fn test_category_text_round_trip() {
        assert_eq!(ActivityCategory::TabletopRpg.to_string(), "TABLETOP_RPG");
        assert_eq!(
            ActivityCategory::from_str("BOARD_GAME").unwrap(),
            ActivityCategory::BoardGame
        );
        assert!(ActivityCategory::from_str("board game").is_err());
    }
}
