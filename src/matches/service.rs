use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::MatchModel,
    repository::MatchRepository,
    types::{CreateMatchRequest, MatchResponse, UpdateMatchRequest},
};
use crate::{
    competition::repository::CompetitionRepository, shared::AppError, standings::StandingsService,
};

/// Service for match bookkeeping.
///
/// Every write is followed by a synchronous standings recompute of the
/// competition it touched, so the table never lags behind the results.
pub struct MatchService {
    repository: Arc<dyn MatchRepository>,
    competitions: Arc<dyn CompetitionRepository>,
    standings: Arc<StandingsService>,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn MatchRepository>,
        competitions: Arc<dyn CompetitionRepository>,
        standings: Arc<StandingsService>,
    ) -> Self {
        Self {
            repository,
            competitions,
            standings,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_match(
        &self,
        competition_id: &str,
        request: CreateMatchRequest,
    ) -> Result<MatchResponse, AppError> {
        self.ensure_competition_exists(competition_id).await?;
        let (home_team, away_team) = validate_teams(&request.home_team, &request.away_team)?;
        let scores = validate_scores(request.home_score, request.away_score)?;

        let mut m = MatchModel::new(
            competition_id.to_string(),
            home_team,
            away_team,
            request.scheduled_at.unwrap_or_else(Utc::now),
        );
        m.notes = request.notes;
        if let Some(status) = request.status {
            m.status = status;
        }
        if let Some((home_score, away_score)) = scores {
            m.record_result(home_score, away_score);
        }

        self.repository.create_match(&m).await?;
        info!(
            match_id = %m.id,
            competition_id = %competition_id,
            played = m.is_played(),
            "Match created"
        );

        self.standings.recompute(competition_id).await?;
        Ok(m.into())
    }

    #[instrument(skip(self))]
    pub async fn get_match(&self, match_id: &str) -> Result<MatchResponse, AppError> {
        Ok(self.load(match_id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn list_matches(&self, competition_id: &str) -> Result<Vec<MatchResponse>, AppError> {
        self.ensure_competition_exists(competition_id).await?;
        let matches = self.repository.list_by_competition(competition_id).await?;
        debug!(competition_id = %competition_id, match_count = matches.len(), "Matches listed");
        Ok(matches.into_iter().map(MatchResponse::from).collect())
    }

    /// Applies a partial update; a match moved to another competition
    /// re-ranks both of them
    #[instrument(skip(self, request))]
    pub async fn update_match(
        &self,
        match_id: &str,
        request: UpdateMatchRequest,
    ) -> Result<MatchResponse, AppError> {
        let mut m = self.load(match_id).await?;
        let previous_competition = m.competition_id.clone();

        if let Some(competition_id) = request.competition_id {
            self.ensure_competition_exists(&competition_id).await?;
            m.competition_id = competition_id;
        }

        let home_team = request.home_team.unwrap_or_else(|| m.home_team.clone());
        let away_team = request.away_team.unwrap_or_else(|| m.away_team.clone());
        let (home_team, away_team) = validate_teams(&home_team, &away_team)?;
        m.home_team = home_team;
        m.away_team = away_team;

        if let Some(scheduled_at) = request.scheduled_at {
            m.scheduled_at = scheduled_at;
        }
        if let Some(notes) = request.notes {
            m.notes = Some(notes);
        }

        if request.clear_result {
            m.clear_result();
        } else if let Some((home_score, away_score)) =
            validate_scores(request.home_score, request.away_score)?
        {
            m.record_result(home_score, away_score);
        }
        if let Some(status) = request.status {
            m.status = status;
        }

        m.touch();
        self.repository.update_match(&m).await?;
        info!(match_id = %m.id, competition_id = %m.competition_id, "Match updated");

        self.standings.recompute(&m.competition_id).await?;
        if previous_competition != m.competition_id {
            self.standings.recompute(&previous_competition).await?;
        }

        Ok(m.into())
    }

    /// Stores a final score and re-ranks the competition
    #[instrument(skip(self))]
    pub async fn record_result(
        &self,
        match_id: &str,
        home_score: i32,
        away_score: i32,
    ) -> Result<MatchResponse, AppError> {
        validate_scores(Some(home_score), Some(away_score))?;
        let mut m = self.load(match_id).await?;

        m.record_result(home_score, away_score);
        self.repository.update_match(&m).await?;

        info!(
            match_id = %m.id,
            competition_id = %m.competition_id,
            home_score,
            away_score,
            "Match result recorded"
        );

        self.standings.recompute(&m.competition_id).await?;
        Ok(m.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_match(&self, match_id: &str) -> Result<(), AppError> {
        let m = self.load(match_id).await?;

        self.repository.delete_match(match_id).await?;
        info!(match_id = %match_id, competition_id = %m.competition_id, "Match deleted");

        self.standings.recompute(&m.competition_id).await?;
        Ok(())
    }

    async fn load(&self, match_id: &str) -> Result<MatchModel, AppError> {
        self.repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Match {} not found", match_id)))
    }

    async fn ensure_competition_exists(&self, competition_id: &str) -> Result<(), AppError> {
        match self.competitions.get_competition(competition_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Competition {} not found",
                competition_id
            ))),
        }
    }
}

fn validate_teams(home_team: &str, away_team: &str) -> Result<(String, String), AppError> {
    let (home_team, away_team) = (home_team.trim(), away_team.trim());
    if home_team.is_empty() || away_team.is_empty() {
        return Err(AppError::BadRequest(
            "home_team and away_team must not be empty".to_string(),
        ));
    }
    if home_team == away_team {
        return Err(AppError::BadRequest(
            "A team cannot play against itself".to_string(),
        ));
    }
    Ok((home_team.to_string(), away_team.to_string()))
}

/// Highest score a single side may record
pub const MAX_SCORE: i32 = 9_999;

/// Both scores or neither; each within `0..=MAX_SCORE`
fn validate_scores(
    home_score: Option<i32>,
    away_score: Option<i32>,
) -> Result<Option<(i32, i32)>, AppError> {
    match (home_score, away_score) {
        (None, None) => Ok(None),
        (Some(home), Some(away)) if home < 0 || away < 0 => Err(AppError::BadRequest(
            "Scores must not be negative".to_string(),
        )),
        (Some(home), Some(away)) if home > MAX_SCORE || away > MAX_SCORE => {
            Err(AppError::BadRequest(format!(
                "Scores must not exceed {}",
                MAX_SCORE
            )))
        }
        (Some(home), Some(away)) => Ok(Some((home, away))),
        _ => Err(AppError::BadRequest(
            "home_score and away_score must be set together".to_string(),
        )),
    }
}
