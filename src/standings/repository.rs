use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{models::StandingRow, StandingsError};

/// Team registry plus the derived standings rows of each competition.
///
/// Teams are kept in registration order. Rows are only ever written as a
/// whole table through `replace_standings`, except for the unranked row that
/// `register_team` creates alongside the team.
#[async_trait]
pub trait StandingsRepository: Send + Sync {
    async fn register_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<StandingRow, StandingsError>;
    async fn unregister_team(&self, competition_id: &str, team: &str)
        -> Result<(), StandingsError>;
    async fn list_teams(&self, competition_id: &str) -> Result<Vec<String>, StandingsError>;
    /// Ranked rows by position, then unranked rows in registration order
    async fn list_standings(&self, competition_id: &str)
        -> Result<Vec<StandingRow>, StandingsError>;
    /// Atomically swaps the whole table of a competition
    async fn replace_standings(
        &self,
        competition_id: &str,
        rows: &[StandingRow],
    ) -> Result<(), StandingsError>;
    async fn clear_competition(&self, competition_id: &str) -> Result<(), StandingsError>;
}

#[derive(Debug, Default)]
struct CompetitionStandings {
    teams: Vec<String>,
    rows: Vec<StandingRow>,
}

/// In-memory implementation of StandingsRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryStandingsRepository {
    competitions: Arc<RwLock<HashMap<String, CompetitionStandings>>>,
}

impl InMemoryStandingsRepository {
    pub fn new() -> Self {
        Self {
            competitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl StandingsRepository for InMemoryStandingsRepository {
    #[instrument(skip(self))]
    async fn register_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<StandingRow, StandingsError> {
        let mut competitions = self.competitions.write().await;
        let standings = competitions.entry(competition_id.to_string()).or_default();

        if standings.teams.iter().any(|t| t == team) {
            return Err(StandingsError::TeamAlreadyRegistered {
                competition_id: competition_id.to_string(),
                team: team.to_string(),
            });
        }

        let row = StandingRow::unranked(competition_id, team);
        standings.teams.push(team.to_string());
        standings.rows.push(row.clone());

        debug!(competition_id = %competition_id, team = %team, "Team registered in memory");
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn unregister_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<(), StandingsError> {
        let mut competitions = self.competitions.write().await;
        let not_found = || StandingsError::TeamNotFound {
            competition_id: competition_id.to_string(),
            team: team.to_string(),
        };

        let standings = competitions.get_mut(competition_id).ok_or_else(not_found)?;
        if !standings.teams.iter().any(|t| t == team) {
            return Err(not_found());
        }

        standings.teams.retain(|t| t != team);
        standings.rows.retain(|r| r.team != team);

        debug!(competition_id = %competition_id, team = %team, "Team unregistered in memory");
        Ok(())
    }

    async fn list_teams(&self, competition_id: &str) -> Result<Vec<String>, StandingsError> {
        let competitions = self.competitions.read().await;
        Ok(competitions
            .get(competition_id)
            .map(|s| s.teams.clone())
            .unwrap_or_default())
    }

    async fn list_standings(
        &self,
        competition_id: &str,
    ) -> Result<Vec<StandingRow>, StandingsError> {
        let competitions = self.competitions.read().await;
        let Some(standings) = competitions.get(competition_id) else {
            return Ok(Vec::new());
        };

        let registration: HashMap<&str, usize> = standings
            .teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let mut rows = standings.rows.clone();
        rows.sort_by_key(|r| {
            (
                r.position.is_none(),
                r.position.unwrap_or_default(),
                registration.get(r.team.as_str()).copied().unwrap_or(usize::MAX),
            )
        });
        Ok(rows)
    }

    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    async fn replace_standings(
        &self,
        competition_id: &str,
        rows: &[StandingRow],
    ) -> Result<(), StandingsError> {
        let mut competitions = self.competitions.write().await;
        let standings = competitions.entry(competition_id.to_string()).or_default();

        if let Some(stray) = rows.iter().find(|r| !standings.teams.contains(&r.team)) {
            warn!(competition_id = %competition_id, team = %stray.team, "Refusing standings for unregistered team");
            return Err(StandingsError::TeamNotFound {
                competition_id: competition_id.to_string(),
                team: stray.team.clone(),
            });
        }

        standings.rows = rows.to_vec();
        Ok(())
    }

    async fn clear_competition(&self, competition_id: &str) -> Result<(), StandingsError> {
        let mut competitions = self.competitions.write().await;
        competitions.remove(competition_id);
        Ok(())
    }
}

/// PostgreSQL implementation of StandingsRepository
///
/// Uses `competition_teams` as the registry and `standings` for the derived
/// rows; a standings row cascades away with its registry entry.
pub struct PostgresStandingsRepository {
    pool: PgPool,
}

impl PostgresStandingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> StandingsError {
    warn!(error = %e, "Standings query failed");
    StandingsError::Repository(e.to_string())
}

fn row_from_pg(row: &PgRow) -> StandingRow {
    StandingRow {
        competition_id: row.get("competition_id"),
        team: row.get("team"),
        position: row.get("position"),
        points: row.get("points"),
        played: row.get("played"),
        wins: row.get("wins"),
        draws: row.get("draws"),
        losses: row.get("losses"),
        goals_for: row.get("goals_for"),
        goals_against: row.get("goals_against"),
    }
}

const INSERT_STANDING: &str = "INSERT INTO standings \
    (competition_id, team, position, points, played, wins, draws, losses, goals_for, goals_against, updated_at) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)";

#[async_trait]
impl StandingsRepository for PostgresStandingsRepository {
    #[instrument(skip(self))]
    async fn register_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<StandingRow, StandingsError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let inserted = sqlx::query(
            "INSERT INTO competition_teams (competition_id, team, registered_at) VALUES ($1, $2, $3) \
             ON CONFLICT (competition_id, team) DO NOTHING",
        )
        .bind(competition_id)
        .bind(team)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if inserted.rows_affected() == 0 {
            return Err(StandingsError::TeamAlreadyRegistered {
                competition_id: competition_id.to_string(),
                team: team.to_string(),
            });
        }

        let row = StandingRow::unranked(competition_id, team);
        sqlx::query(INSERT_STANDING)
            .bind(&row.competition_id)
            .bind(&row.team)
            .bind(row.position)
            .bind(row.points)
            .bind(row.played)
            .bind(row.wins)
            .bind(row.draws)
            .bind(row.losses)
            .bind(row.goals_for)
            .bind(row.goals_against)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        debug!(competition_id = %competition_id, team = %team, "Team registered in database");
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn unregister_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<(), StandingsError> {
        let result =
            sqlx::query("DELETE FROM competition_teams WHERE competition_id = $1 AND team = $2")
                .bind(competition_id)
                .bind(team)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StandingsError::TeamNotFound {
                competition_id: competition_id.to_string(),
                team: team.to_string(),
            });
        }

        debug!(competition_id = %competition_id, team = %team, "Team unregistered in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, competition_id: &str) -> Result<Vec<String>, StandingsError> {
        let rows = sqlx::query(
            "SELECT team FROM competition_teams WHERE competition_id = $1 ORDER BY seq",
        )
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(|row| row.get("team")).collect())
    }

    #[instrument(skip(self))]
    async fn list_standings(
        &self,
        competition_id: &str,
    ) -> Result<Vec<StandingRow>, StandingsError> {
        let rows = sqlx::query(
            "SELECT s.competition_id, s.team, s.position, s.points, s.played, s.wins, s.draws, \
                    s.losses, s.goals_for, s.goals_against \
             FROM standings s \
             JOIN competition_teams t ON t.competition_id = s.competition_id AND t.team = s.team \
             WHERE s.competition_id = $1 \
             ORDER BY s.position ASC NULLS LAST, t.seq ASC",
        )
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(row_from_pg).collect())
    }

    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    async fn replace_standings(
        &self,
        competition_id: &str,
        rows: &[StandingRow],
    ) -> Result<(), StandingsError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM standings WHERE competition_id = $1")
            .bind(competition_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let now = Utc::now();
        for row in rows {
            sqlx::query(INSERT_STANDING)
                .bind(competition_id)
                .bind(&row.team)
                .bind(row.position)
                .bind(row.points)
                .bind(row.played)
                .bind(row.wins)
                .bind(row.draws)
                .bind(row.losses)
                .bind(row.goals_for)
                .bind(row.goals_against)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        debug!(competition_id = %competition_id, "Standings replaced in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_competition(&self, competition_id: &str) -> Result<(), StandingsError> {
        sqlx::query("DELETE FROM competition_teams WHERE competition_id = $1")
            .bind(competition_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
