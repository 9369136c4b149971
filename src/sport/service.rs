use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::SportModel,
    repository::SportRepository,
    types::{CreateSportRequest, SportResponse, UpdateSportRequest},
};
use crate::{
    competition::repository::CompetitionRepository, shared::AppError, standings::StandingsService,
};

const MIN_NAME_LEN: usize = 3;

/// Service for sport and activity type management
pub struct SportService {
    repository: Arc<dyn SportRepository>,
    competitions: Arc<dyn CompetitionRepository>,
    standings: Arc<StandingsService>,
}

impl SportService {
    pub fn new(
        repository: Arc<dyn SportRepository>,
        competitions: Arc<dyn CompetitionRepository>,
        standings: Arc<StandingsService>,
    ) -> Self {
        Self {
            repository,
            competitions,
            standings,
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_sport(&self, request: CreateSportRequest) -> Result<SportResponse, AppError> {
        let name = validate_name(&request.name)?;
        let rules = request.classification_rules.unwrap_or_default();
        rules.validate()?;

        let mut sport = SportModel::new(name, rules);
        sport.description = request.description;
        if let Some(category) = request.category {
            sport.category = category;
        }
        if let Some(metrics) = request.tracked_metrics {
            sport.tracked_metrics = metrics;
        }

        self.repository.create_sport(&sport).await?;

        info!(sport_id = %sport.id, name = %sport.name, "Sport created");
        Ok(sport.into())
    }

    #[instrument(skip(self))]
    pub async fn get_sport(&self, sport_id: &str) -> Result<SportResponse, AppError> {
        self.repository
            .get_sport(sport_id)
            .await?
            .map(SportResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("Sport {} not found", sport_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_sports(&self) -> Result<Vec<SportResponse>, AppError> {
        let sports = self.repository.list_sports().await?;
        debug!(sport_count = sports.len(), "Sports listed");
        Ok(sports.into_iter().map(SportResponse::from).collect())
    }

    /// Applies a partial update; new scoring rules re-rank every competition
    /// that relies on them
    #[instrument(skip(self, request))]
    pub async fn update_sport(
        &self,
        sport_id: &str,
        request: UpdateSportRequest,
    ) -> Result<SportResponse, AppError> {
        let mut sport = self
            .repository
            .get_sport(sport_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sport {} not found", sport_id)))?;

        if let Some(name) = request.name {
            sport.name = validate_name(&name)?;
        }
        if let Some(description) = request.description {
            sport.description = Some(description);
        }
        if let Some(category) = request.category {
            sport.category = category;
        }
        if let Some(metrics) = request.tracked_metrics {
            sport.tracked_metrics = metrics;
        }

        let rules_changed = match request.classification_rules {
            Some(rules) if rules != sport.classification_rules => {
                rules.validate()?;
                sport.classification_rules = rules;
                true
            }
            _ => false,
        };

        sport.touch();
        self.repository.update_sport(&sport).await?;
        info!(sport_id = %sport.id, rules_changed, "Sport updated");

        if rules_changed {
            self.recompute_dependent_competitions(&sport.id).await?;
        }

        Ok(sport.into())
    }

    /// Deletes a sport no competition refers to
    #[instrument(skip(self))]
    pub async fn delete_sport(&self, sport_id: &str) -> Result<(), AppError> {
        let in_use = self.competitions.list_by_sport(sport_id).await?;
        if !in_use.is_empty() {
            warn!(
                sport_id = %sport_id,
                competitions = in_use.len(),
                "Refusing to delete sport in use"
            );
            return Err(AppError::Conflict(format!(
                "Sport {} is used by {} competition(s)",
                sport_id,
                in_use.len()
            )));
        }

        self.repository.delete_sport(sport_id).await?;
        info!(sport_id = %sport_id, "Sport deleted");
        Ok(())
    }

    async fn recompute_dependent_competitions(&self, sport_id: &str) -> Result<(), AppError> {
        let competitions = self.competitions.list_by_sport(sport_id).await?;
        for competition in competitions
            .iter()
            .filter(|c| c.custom_scoring.is_none())
        {
            self.standings.recompute(&competition.id).await?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Sport name must be at least {} characters",
            MIN_NAME_LEN
        )));
    }
    Ok(name.to_string())
}
