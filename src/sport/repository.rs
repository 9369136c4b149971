use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{ActivityCategory, SportModel};
use crate::shared::{database_error, AppError};
use crate::standings::ScoringConfig;

/// Trait for sport repository operations
#[async_trait]
pub trait SportRepository: Send + Sync {
    async fn create_sport(&self, sport: &SportModel) -> Result<(), AppError>;
    async fn get_sport(&self, sport_id: &str) -> Result<Option<SportModel>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<SportModel>, AppError>;
    async fn list_sports(&self) -> Result<Vec<SportModel>, AppError>;
    async fn update_sport(&self, sport: &SportModel) -> Result<(), AppError>;
    async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of SportRepository for development and testing
pub struct InMemorySportRepository {
    sports: Mutex<HashMap<String, SportModel>>,
}

impl Default for InMemorySportRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySportRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sports: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SportRepository for InMemorySportRepository {
    #[instrument(skip(self, sport))]
    async fn create_sport(&self, sport: &SportModel) -> Result<(), AppError> {
        debug!(sport_id = %sport.id, name = %sport.name, "Creating sport in memory");

        let mut sports = self.sports.lock().unwrap();
        if sports.contains_key(&sport.id) || sports.values().any(|s| s.name == sport.name) {
            warn!(name = %sport.name, "Sport already exists in memory");
            return Err(AppError::Conflict(format!(
                "Sport {} already exists",
                sport.name
            )));
        }
        sports.insert(sport.id.clone(), sport.clone());
        Ok(())
    }

    async fn get_sport(&self, sport_id: &str) -> Result<Option<SportModel>, AppError> {
        let sports = self.sports.lock().unwrap();
        Ok(sports.get(sport_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SportModel>, AppError> {
        let sports = self.sports.lock().unwrap();
        Ok(sports.values().find(|s| s.name == name).cloned())
    }

    async fn list_sports(&self) -> Result<Vec<SportModel>, AppError> {
        let sports = self.sports.lock().unwrap();
        let mut list: Vec<SportModel> = sports.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    #[instrument(skip(self, sport))]
    async fn update_sport(&self, sport: &SportModel) -> Result<(), AppError> {
        let mut sports = self.sports.lock().unwrap();
        if !sports.contains_key(&sport.id) {
            warn!(sport_id = %sport.id, "Sport not found for update in memory");
            return Err(AppError::NotFound("Sport not found".to_string()));
        }
        if sports
            .values()
            .any(|s| s.id != sport.id && s.name == sport.name)
        {
            return Err(AppError::Conflict(format!(
                "Sport {} already exists",
                sport.name
            )));
        }
        sports.insert(sport.id.clone(), sport.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError> {
        let mut sports = self.sports.lock().unwrap();
        if sports.remove(sport_id).is_none() {
            warn!(sport_id = %sport_id, "Sport not found for deletion in memory");
            return Err(AppError::NotFound("Sport not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation of sport repository
pub struct PostgresSportRepository {
    pool: PgPool,
}

impl PostgresSportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SPORT_COLUMNS: &str = "id, name, description, category, is_custom, points_for_win, \
    points_for_draw, points_for_loss, tracked_metrics, created_at, updated_at";

fn sport_from_row(row: &PgRow) -> Result<SportModel, AppError> {
    let category: String = row.get("category");
    let category = ActivityCategory::from_str(&category).map_err(|_| {
        AppError::DatabaseError(format!("Unknown activity category {}", category))
    })?;

    Ok(SportModel {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        category,
        is_custom: row.get("is_custom"),
        classification_rules: ScoringConfig::new(
            row.get("points_for_win"),
            row.get("points_for_draw"),
            row.get("points_for_loss"),
        ),
        tracked_metrics: row.get("tracked_metrics"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl SportRepository for PostgresSportRepository {
    #[instrument(skip(self, sport))]
    async fn create_sport(&self, sport: &SportModel) -> Result<(), AppError> {
        debug!(sport_id = %sport.id, name = %sport.name, "Creating sport in database");

        sqlx::query(&format!(
            "INSERT INTO sports ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            SPORT_COLUMNS
        ))
        .bind(&sport.id)
        .bind(&sport.name)
        .bind(&sport.description)
        .bind(sport.category.to_string())
        .bind(sport.is_custom)
        .bind(sport.classification_rules.points_for_win)
        .bind(sport.classification_rules.points_for_draw)
        .bind(sport.classification_rules.points_for_loss)
        .bind(&sport.tracked_metrics)
        .bind(sport.created_at)
        .bind(sport.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_sport(&self, sport_id: &str) -> Result<Option<SportModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM sports WHERE id = $1", SPORT_COLUMNS))
            .bind(sport_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.as_ref().map(sport_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<SportModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sports WHERE name = $1",
            SPORT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(sport_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_sports(&self) -> Result<Vec<SportModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM sports ORDER BY name",
            SPORT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(sport_from_row).collect()
    }

    #[instrument(skip(self, sport))]
    async fn update_sport(&self, sport: &SportModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE sports SET name = $2, description = $3, category = $4, points_for_win = $5, \
             points_for_draw = $6, points_for_loss = $7, tracked_metrics = $8, updated_at = $9 \
             WHERE id = $1",
        )
        .bind(&sport.id)
        .bind(&sport.name)
        .bind(&sport.description)
        .bind(sport.category.to_string())
        .bind(sport.classification_rules.points_for_win)
        .bind(sport.classification_rules.points_for_draw)
        .bind(sport.classification_rules.points_for_loss)
        .bind(&sport.tracked_metrics)
        .bind(sport.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(sport_id = %sport.id, "Sport not found for update");
            return Err(AppError::NotFound("Sport not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sports WHERE id = $1")
            .bind(sport_id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(sport_id = %sport_id, "Sport not found for deletion");
            return Err(AppError::NotFound("Sport not found".to_string()));
        }
        Ok(())
    }
}
