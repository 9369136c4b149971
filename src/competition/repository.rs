use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{CompetitionFormat, CompetitionModel, CompetitionStatus};
use crate::shared::{database_error, AppError};
use crate::standings::ScoringConfig;

/// Trait for competition repository operations
#[async_trait]
pub trait CompetitionRepository: Send + Sync {
    async fn create_competition(&self, competition: &CompetitionModel) -> Result<(), AppError>;
    async fn get_competition(
        &self,
        competition_id: &str,
    ) -> Result<Option<CompetitionModel>, AppError>;
    async fn list_competitions(&self) -> Result<Vec<CompetitionModel>, AppError>;
    async fn list_by_sport(&self, sport_id: &str) -> Result<Vec<CompetitionModel>, AppError>;
    async fn update_competition(&self, competition: &CompetitionModel) -> Result<(), AppError>;
    async fn delete_competition(&self, competition_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of CompetitionRepository for development and testing
pub struct InMemoryCompetitionRepository {
    competitions: Mutex<HashMap<String, CompetitionModel>>,
}

impl Default for InMemoryCompetitionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCompetitionRepository {
    pub fn new() -> Self {
        Self {
            competitions: Mutex::new(HashMap::new()),
        }
    }
}

fn by_start_date(list: &mut [CompetitionModel]) {
    list.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[async_trait]
impl CompetitionRepository for InMemoryCompetitionRepository {
    #[instrument(skip(self, competition))]
    async fn create_competition(&self, competition: &CompetitionModel) -> Result<(), AppError> {
        debug!(competition_id = %competition.id, "Creating competition in memory");

        let mut competitions = self.competitions.lock().unwrap();
        if competitions.contains_key(&competition.id) {
            return Err(AppError::Conflict(format!(
                "Competition {} already exists",
                competition.id
            )));
        }
        competitions.insert(competition.id.clone(), competition.clone());
        Ok(())
    }

    async fn get_competition(
        &self,
        competition_id: &str,
    ) -> Result<Option<CompetitionModel>, AppError> {
        let competitions = self.competitions.lock().unwrap();
        Ok(competitions.get(competition_id).cloned())
    }

    async fn list_competitions(&self) -> Result<Vec<CompetitionModel>, AppError> {
        let competitions = self.competitions.lock().unwrap();
        let mut list: Vec<CompetitionModel> = competitions.values().cloned().collect();
        by_start_date(&mut list);
        Ok(list)
    }

    async fn list_by_sport(&self, sport_id: &str) -> Result<Vec<CompetitionModel>, AppError> {
        let competitions = self.competitions.lock().unwrap();
        let mut list: Vec<CompetitionModel> = competitions
            .values()
            .filter(|c| c.sport_id == sport_id)
            .cloned()
            .collect();
        by_start_date(&mut list);
        Ok(list)
    }

    #[instrument(skip(self, competition))]
    async fn update_competition(&self, competition: &CompetitionModel) -> Result<(), AppError> {
        let mut competitions = self.competitions.lock().unwrap();
        match competitions.get_mut(&competition.id) {
            Some(existing) => {
                *existing = competition.clone();
                Ok(())
            }
            None => {
                warn!(competition_id = %competition.id, "Competition not found for update in memory");
                Err(AppError::NotFound("Competition not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_competition(&self, competition_id: &str) -> Result<(), AppError> {
        let mut competitions = self.competitions.lock().unwrap();
        if competitions.remove(competition_id).is_none() {
            warn!(competition_id = %competition_id, "Competition not found for deletion in memory");
            return Err(AppError::NotFound("Competition not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation of competition repository
pub struct PostgresCompetitionRepository {
    pool: PgPool,
}

impl PostgresCompetitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COMPETITION_COLUMNS: &str = "id, name, description, sport_id, format, status, max_teams, \
    start_date, end_date, custom_points_for_win, custom_points_for_draw, custom_points_for_loss, \
    is_public, created_at, updated_at";

fn competition_from_row(row: &PgRow) -> Result<CompetitionModel, AppError> {
    let format: String = row.get("format");
    let format = CompetitionFormat::from_str(&format)
        .map_err(|_| AppError::DatabaseError(format!("Unknown competition format {}", format)))?;
    let status: String = row.get("status");
    let status = CompetitionStatus::from_str(&status)
        .map_err(|_| AppError::DatabaseError(format!("Unknown competition status {}", status)))?;

    let win: Option<f64> = row.get("custom_points_for_win");
    let draw: Option<f64> = row.get("custom_points_for_draw");
    let loss: Option<f64> = row.get("custom_points_for_loss");
    let custom_scoring = match (win, draw, loss) {
        (Some(win), Some(draw), Some(loss)) => Some(ScoringConfig::new(win, draw, loss)),
        _ => None,
    };

    Ok(CompetitionModel {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        sport_id: row.get("sport_id"),
        format,
        status,
        max_teams: row.get("max_teams"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        custom_scoring,
        is_public: row.get("is_public"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl CompetitionRepository for PostgresCompetitionRepository {
    #[instrument(skip(self, competition))]
    async fn create_competition(&self, competition: &CompetitionModel) -> Result<(), AppError> {
        debug!(competition_id = %competition.id, "Creating competition in database");

        let scoring = competition.custom_scoring;
        sqlx::query(&format!(
            "INSERT INTO competitions ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            COMPETITION_COLUMNS
        ))
        .bind(&competition.id)
        .bind(&competition.name)
        .bind(&competition.description)
        .bind(&competition.sport_id)
        .bind(competition.format.to_string())
        .bind(competition.status.to_string())
        .bind(competition.max_teams)
        .bind(competition.start_date)
        .bind(competition.end_date)
        .bind(scoring.map(|s| s.points_for_win))
        .bind(scoring.map(|s| s.points_for_draw))
        .bind(scoring.map(|s| s.points_for_loss))
        .bind(competition.is_public)
        .bind(competition.created_at)
        .bind(competition.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_competition(
        &self,
        competition_id: &str,
    ) -> Result<Option<CompetitionModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM competitions WHERE id = $1",
            COMPETITION_COLUMNS
        ))
        .bind(competition_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(competition_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_competitions(&self) -> Result<Vec<CompetitionModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM competitions ORDER BY start_date, created_at",
            COMPETITION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(competition_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_by_sport(&self, sport_id: &str) -> Result<Vec<CompetitionModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM competitions WHERE sport_id = $1 ORDER BY start_date, created_at",
            COMPETITION_COLUMNS
        ))
        .bind(sport_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(competition_from_row).collect()
    }

    #[instrument(skip(self, competition))]
    async fn update_competition(&self, competition: &CompetitionModel) -> Result<(), AppError> {
        let scoring = competition.custom_scoring;
        let result = sqlx::query(
            "UPDATE competitions SET name = $2, description = $3, sport_id = $4, format = $5, \
             status = $6, max_teams = $7, start_date = $8, end_date = $9, \
             custom_points_for_win = $10, custom_points_for_draw = $11, \
             custom_points_for_loss = $12, is_public = $13, updated_at = $14 WHERE id = $1",
        )
        .bind(&competition.id)
        .bind(&competition.name)
        .bind(&competition.description)
        .bind(&competition.sport_id)
        .bind(competition.format.to_string())
        .bind(competition.status.to_string())
        .bind(competition.max_teams)
        .bind(competition.start_date)
        .bind(competition.end_date)
        .bind(scoring.map(|s| s.points_for_win))
        .bind(scoring.map(|s| s.points_for_draw))
        .bind(scoring.map(|s| s.points_for_loss))
        .bind(competition.is_public)
        .bind(competition.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(competition_id = %competition.id, "Competition not found for update");
            return Err(AppError::NotFound("Competition not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_competition(&self, competition_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM competitions WHERE id = $1")
            .bind(competition_id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(competition_id = %competition_id, "Competition not found for deletion");
            return Err(AppError::NotFound("Competition not found".to_string()));
        }
        Ok(())
    }
}
