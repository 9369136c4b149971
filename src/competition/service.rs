use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{CompetitionModel, CompetitionStatus},
    repository::CompetitionRepository,
    types::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
};
use crate::{
    matches::repository::MatchRepository, shared::AppError, sport::repository::SportRepository,
    standings::StandingsService,
};

/// Service for competition business logic
pub struct CompetitionService {
    repository: Arc<dyn CompetitionRepository>,
    sports: Arc<dyn SportRepository>,
    matches: Arc<dyn MatchRepository>,
    standings: Arc<StandingsService>,
}

impl CompetitionService {
    pub fn new(
        repository: Arc<dyn CompetitionRepository>,
        sports: Arc<dyn SportRepository>,
        matches: Arc<dyn MatchRepository>,
        standings: Arc<StandingsService>,
    ) -> Self {
        Self {
            repository,
            sports,
            matches,
            standings,
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_competition(
        &self,
        request: CreateCompetitionRequest,
    ) -> Result<CompetitionResponse, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Competition name must not be empty".to_string(),
            ));
        }
        self.ensure_sport_exists(&request.sport_id).await?;

        let mut competition =
            CompetitionModel::new(name.to_string(), request.sport_id, request.start_date);
        competition.description = request.description;
        competition.max_teams = request.max_teams;
        competition.end_date = request.end_date;
        competition.custom_scoring = request.custom_scoring;
        if let Some(format) = request.format {
            competition.format = format;
        }
        if let Some(is_public) = request.is_public {
            competition.is_public = is_public;
        }
        validate(&competition)?;

        self.repository.create_competition(&competition).await?;

        info!(
            competition_id = %competition.id,
            sport_id = %competition.sport_id,
            "Competition created"
        );
        Ok(competition.into())
    }

    #[instrument(skip(self))]
    pub async fn get_competition(
        &self,
        competition_id: &str,
    ) -> Result<CompetitionResponse, AppError> {
        Ok(self.load(competition_id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn list_competitions(&self) -> Result<Vec<CompetitionResponse>, AppError> {
        let competitions = self.repository.list_competitions().await?;
        debug!(competition_count = competitions.len(), "Competitions listed");
        Ok(competitions
            .into_iter()
            .map(CompetitionResponse::from)
            .collect())
    }

    /// Applies a partial update and recomputes, since the effective scoring
    /// rules may have changed
    #[instrument(skip(self, request))]
    pub async fn update_competition(
        &self,
        competition_id: &str,
        request: UpdateCompetitionRequest,
    ) -> Result<CompetitionResponse, AppError> {
        let mut competition = self.load(competition_id).await?;

        if let Some(name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest(
                    "Competition name must not be empty".to_string(),
                ));
            }
            competition.name = name.to_string();
        }
        if let Some(sport_id) = request.sport_id {
            self.ensure_sport_exists(&sport_id).await?;
            competition.sport_id = sport_id;
        }
        if let Some(description) = request.description {
            competition.description = Some(description);
        }
        if let Some(format) = request.format {
            competition.format = format;
        }
        if let Some(max_teams) = request.max_teams {
            competition.max_teams = Some(max_teams);
        }
        if let Some(start_date) = request.start_date {
            competition.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            competition.end_date = Some(end_date);
        }
        if request.clear_custom_scoring {
            competition.custom_scoring = None;
        } else if let Some(scoring) = request.custom_scoring {
            competition.custom_scoring = Some(scoring);
        }
        if let Some(is_public) = request.is_public {
            competition.is_public = is_public;
        }
        validate(&competition)?;

        competition.touch();
        self.repository.update_competition(&competition).await?;
        info!(competition_id = %competition.id, "Competition updated");

        self.standings.recompute(&competition.id).await?;

        Ok(competition.into())
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        competition_id: &str,
        status: CompetitionStatus,
    ) -> Result<CompetitionResponse, AppError> {
        let mut competition = self.load(competition_id).await?;
        let previous = competition.status;

        competition.status = status;
        competition.touch();
        self.repository.update_competition(&competition).await?;

        info!(
            competition_id = %competition.id,
            from = %previous,
            to = %status,
            "Competition status changed"
        );
        Ok(competition.into())
    }

    /// Deletes the competition together with its matches and standings
    #[instrument(skip(self))]
    pub async fn delete_competition(&self, competition_id: &str) -> Result<(), AppError> {
        self.load(competition_id).await?;

        self.repository.delete_competition(competition_id).await?;
        let removed_matches = self.matches.delete_by_competition(competition_id).await?;
        self.standings.clear_competition(competition_id).await?;

        info!(
            competition_id = %competition_id,
            removed_matches,
            "Competition deleted"
        );
        Ok(())
    }

    async fn load(&self, competition_id: &str) -> Result<CompetitionModel, AppError> {
        self.repository
            .get_competition(competition_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Competition {} not found", competition_id)))
    }

    async fn ensure_sport_exists(&self, sport_id: &str) -> Result<(), AppError> {
        match self.sports.get_sport(sport_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!("Unknown sport {}", sport_id))),
        }
    }
}

fn validate(competition: &CompetitionModel) -> Result<(), AppError> {
    if let Some(end_date) = competition.end_date {
        if end_date < competition.start_date {
            return Err(AppError::BadRequest(
                "end_date must not be before start_date".to_string(),
            ));
        }
    }
    if let Some(max_teams) = competition.max_teams {
        if max_teams <= 0 {
            return Err(AppError::BadRequest(
                "max_teams must be greater than zero".to_string(),
            ));
        }
    }
    if let Some(scoring) = competition.custom_scoring {
        scoring.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::models::MatchModel;
    use crate::shared::AppState;
    use crate::sport::models::SportModel;
    use crate::standings::{ScoringConfig, StandingsError, StandingsRepository};
    use chrono::{Duration, Utc};

    async fn state_with_sport() -> (AppState, String) {
        let state = AppState::in_memory();
        let sport = SportModel::new("Football".to_string(), ScoringConfig::default());
        state.sport_repository.create_sport(&sport).await.unwrap();
        (state, sport.id)
    }

    fn create_request(sport_id: &str) -> CreateCompetitionRequest {
        CreateCompetitionRequest {
            name: "Spring Cup".to_string(),
            description: None,
            sport_id: sport_id.to_string(),
            format: None,
            max_teams: None,
            start_date: Utc::now(),
            end_date: None,
            custom_scoring: None,
            is_public: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_known_sport() {
        let (state, _) = state_with_sport().await;
        let result = state
            .competition_service()
            .create_competition(create_request("no-such-sport"))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_validates_dates_and_limits() {
        let (state, sport_id) = state_with_sport().await;
        let service = state.competition_service();

        let mut backwards = create_request(&sport_id);
        backwards.end_date = Some(backwards.start_date - Duration::days(1));
        assert!(matches!(
            service.create_competition(backwards).await,
            Err(AppError::BadRequest(_))
        ));

        let mut empty = create_request(&sport_id);
        empty.max_teams = Some(0);
        assert!(matches!(
            service.create_competition(empty).await,
            Err(AppError::BadRequest(_))
        ));

        let mut bad_scoring = create_request(&sport_id);
        bad_scoring.custom_scoring = Some(ScoringConfig::new(0.0, 1.0, 0.0));
        assert!(matches!(
            service.create_competition(bad_scoring).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_scoring_override_recomputes_table() {
        let (state, sport_id) = state_with_sport().await;
        let service = state.competition_service();
        let competition = service
            .create_competition(create_request(&sport_id))
            .await
            .unwrap();
        for team in ["A", "B"] {
            state
                .standings_service
                .add_team(&competition.id, team)
                .await
                .unwrap();
        }
        let mut played = MatchModel::new(competition.id.clone(), "A".into(), "B".into(), Utc::now());
        played.record_result(1, 1);
        state.match_repository.create_match(&played).await.unwrap();

        let update = UpdateCompetitionRequest {
            custom_scoring: Some(ScoringConfig::new(1.0, 0.5, 0.0)),
            ..Default::default()
        };
        service
            .update_competition(&competition.id, update)
            .await
            .unwrap();

        let rows = state.standings_service.standings(&competition.id).await.unwrap();
        assert!(rows.iter().all(|r| r.points == 0.5 && r.draws == 1));
    }

    #[tokio::test]
    async fn test_update_status() {
        let (state, sport_id) = state_with_sport().await;
        let service = state.competition_service();
        let competition = service
            .create_competition(create_request(&sport_id))
            .await
            .unwrap();

        let updated = service
            .update_status(&competition.id, CompetitionStatus::InProgress)
            .await
            .unwrap();

        assert_eq!(updated.status, CompetitionStatus::InProgress);
    }

    #[tokio::test]
    async fn test_delete_cascades_matches_and_standings() {
        let (state, sport_id) = state_with_sport().await;
        let service = state.competition_service();
        let competition = service
            .create_competition(create_request(&sport_id))
            .await
            .unwrap();
        state
            .standings_service
            .add_team(&competition.id, "A")
            .await
            .unwrap();
        let scheduled = MatchModel::new(competition.id.clone(), "A".into(), "B".into(), Utc::now());
        state.match_repository.create_match(&scheduled).await.unwrap();

        service.delete_competition(&competition.id).await.unwrap();

        assert!(state
            .match_repository
            .list_by_competition(&competition.id)
            .await
            .unwrap()
            .is_empty());
        assert!(state
            .standings_repository
            .list_teams(&competition.id)
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            service.get_competition(&competition.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_racing_team_registrations_leaves_nothing_behind() {
        let (state, sport_id) = state_with_sport().await;
        let service = state.competition_service();
        let competition = service
            .create_competition(create_request(&sport_id))
            .await
            .unwrap();

        let registrations: Vec<_> = (0..8)
            .map(|i| {
                let standings = state.standings_service.clone();
                let id = competition.id.clone();
                tokio::spawn(async move { standings.add_team(&id, &format!("Team {}", i)).await })
            })
            .collect();
        service.delete_competition(&competition.id).await.unwrap();

        for handle in registrations {
            match handle.await.unwrap() {
                Ok(_) | Err(StandingsError::CompetitionNotFound(_)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
        assert!(state
            .standings_repository
            .list_teams(&competition.id)
            .await
            .unwrap()
            .is_empty());
    }
}
