use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{ActivityCategory, SportModel};
use crate::standings::ScoringConfig;

/// Request payload for creating a sport or activity type
#[derive(Debug, Deserialize)]
pub struct CreateSportRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<ActivityCategory>,
    /// Falls back to 3 / 1 / 0 when omitted
    pub classification_rules: Option<ScoringConfig>,
    pub tracked_metrics: Option<Vec<String>>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSportRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ActivityCategory>,
    pub classification_rules: Option<ScoringConfig>,
    pub tracked_metrics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SportResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: ActivityCategory,
    pub is_custom: bool,
    pub classification_rules: ScoringConfig,
    pub tracked_metrics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SportModel> for SportResponse {
    fn from(sport: SportModel) -> Self {
        Self {
            id: sport.id,
            name: sport.name,
            description: sport.description,
            category: sport.category,
            is_custom: sport.is_custom,
            classification_rules: sport.classification_rules,
            tracked_metrics: sport.tracked_metrics,
            created_at: sport.created_at,
            updated_at: sport.updated_at,
        }
    }
}
