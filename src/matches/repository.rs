use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{MatchModel, MatchStatus};
use crate::shared::{database_error, AppError};

/// Trait for match repository operations
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, m: &MatchModel) -> Result<(), AppError>;
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError>;
    /// Every match of a competition, by scheduled time
    async fn list_by_competition(&self, competition_id: &str)
        -> Result<Vec<MatchModel>, AppError>;
    /// Matches with both scores, the input of a standings recompute
    async fn list_played(&self, competition_id: &str) -> Result<Vec<MatchModel>, AppError>;
    async fn update_match(&self, m: &MatchModel) -> Result<(), AppError>;
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError>;
    /// Returns how many matches were removed
    async fn delete_by_competition(&self, competition_id: &str) -> Result<u64, AppError>;
}

/// Rejects a score pair the standings could never interpret
fn check_scores(m: &MatchModel) -> Result<(), AppError> {
    if m.home_score.is_some() != m.away_score.is_some() {
        return Err(AppError::BadRequest(
            "home_score and away_score must be set together".to_string(),
        ));
    }
    Ok(())
}

/// In-memory implementation of MatchRepository for development and testing
pub struct InMemoryMatchRepository {
    matches: Mutex<HashMap<String, MatchModel>>,
}

impl Default for InMemoryMatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(HashMap::new()),
        }
    }

    fn collect_sorted<F>(&self, filter: F) -> Vec<MatchModel>
    where
        F: Fn(&MatchModel) -> bool,
    {
        let matches = self.matches.lock().unwrap();
        let mut list: Vec<MatchModel> = matches.values().filter(|m| filter(m)).cloned().collect();
        list.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        list
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, m))]
    async fn create_match(&self, m: &MatchModel) -> Result<(), AppError> {
        debug!(match_id = %m.id, competition_id = %m.competition_id, "Creating match in memory");
        check_scores(m)?;

        let mut matches = self.matches.lock().unwrap();
        if matches.contains_key(&m.id) {
            return Err(AppError::Conflict(format!("Match {} already exists", m.id)));
        }
        matches.insert(m.id.clone(), m.clone());
        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.get(match_id).cloned())
    }

    async fn list_by_competition(
        &self,
        competition_id: &str,
    ) -> Result<Vec<MatchModel>, AppError> {
        Ok(self.collect_sorted(|m| m.competition_id == competition_id))
    }

    async fn list_played(&self, competition_id: &str) -> Result<Vec<MatchModel>, AppError> {
        Ok(self.collect_sorted(|m| m.competition_id == competition_id && m.is_played()))
    }

    #[instrument(skip(self, m))]
    async fn update_match(&self, m: &MatchModel) -> Result<(), AppError> {
        check_scores(m)?;

        let mut matches = self.matches.lock().unwrap();
        match matches.get_mut(&m.id) {
            Some(existing) => {
                *existing = m.clone();
                Ok(())
            }
            None => {
                warn!(match_id = %m.id, "Match not found for update in memory");
                Err(AppError::NotFound("Match not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        if matches.remove(match_id).is_none() {
            warn!(match_id = %match_id, "Match not found for deletion in memory");
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_competition(&self, competition_id: &str) -> Result<u64, AppError> {
        let mut matches = self.matches.lock().unwrap();
        let before = matches.len();
        matches.retain(|_, m| m.competition_id != competition_id);
        Ok((before - matches.len()) as u64)
    }
}

/// PostgreSQL implementation of match repository
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MATCH_COLUMNS: &str = "id, competition_id, home_team, away_team, home_score, away_score, \
    status, scheduled_at, played_at, notes, created_at, updated_at";

fn match_from_row(row: &PgRow) -> Result<MatchModel, AppError> {
    let status: String = row.get("status");
    let status = MatchStatus::from_str(&status)
        .map_err(|_| AppError::DatabaseError(format!("Unknown match status {}", status)))?;

    Ok(MatchModel {
        id: row.get("id"),
        competition_id: row.get("competition_id"),
        home_team: row.get("home_team"),
        away_team: row.get("away_team"),
        home_score: row.get("home_score"),
        away_score: row.get("away_score"),
        status,
        scheduled_at: row.get("scheduled_at"),
        played_at: row.get("played_at"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    #[instrument(skip(self, m))]
    async fn create_match(&self, m: &MatchModel) -> Result<(), AppError> {
        debug!(match_id = %m.id, competition_id = %m.competition_id, "Creating match in database");
        check_scores(m)?;

        sqlx::query(&format!(
            "INSERT INTO matches ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            MATCH_COLUMNS
        ))
        .bind(&m.id)
        .bind(&m.competition_id)
        .bind(&m.home_team)
        .bind(&m.away_team)
        .bind(m.home_score)
        .bind(m.away_score)
        .bind(m.status.to_string())
        .bind(m.scheduled_at)
        .bind(m.played_at)
        .bind(&m.notes)
        .bind(m.created_at)
        .bind(m.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS))
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.as_ref().map(match_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_competition(
        &self,
        competition_id: &str,
    ) -> Result<Vec<MatchModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM matches WHERE competition_id = $1 ORDER BY scheduled_at, created_at",
            MATCH_COLUMNS
        ))
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(match_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_played(&self, competition_id: &str) -> Result<Vec<MatchModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM matches \
             WHERE competition_id = $1 AND home_score IS NOT NULL AND away_score IS NOT NULL \
             ORDER BY scheduled_at, created_at",
            MATCH_COLUMNS
        ))
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(match_from_row).collect()
    }

    #[instrument(skip(self, m))]
    async fn update_match(&self, m: &MatchModel) -> Result<(), AppError> {
        check_scores(m)?;

        let result = sqlx::query(
            "UPDATE matches SET competition_id = $2, home_team = $3, away_team = $4, \
             home_score = $5, away_score = $6, status = $7, scheduled_at = $8, played_at = $9, \
             notes = $10, updated_at = $11 WHERE id = $1",
        )
        .bind(&m.id)
        .bind(&m.competition_id)
        .bind(&m.home_team)
        .bind(&m.away_team)
        .bind(m.home_score)
        .bind(m.away_score)
        .bind(m.status.to_string())
        .bind(m.scheduled_at)
        .bind(m.played_at)
        .bind(&m.notes)
        .bind(m.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(match_id = %m.id, "Match not found for update");
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(match_id = %match_id, "Match not found for deletion");
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_competition(&self, competition_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE competition_id = $1")
            .bind(competition_id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
