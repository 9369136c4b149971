use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument};

use crate::{
    competition::{models::CompetitionModel, repository::CompetitionRepository},
    matches::repository::MatchRepository,
    sport::repository::SportRepository,
};

use super::{
    engine, models::ScoringConfig, repository::StandingsRepository, StandingRow, StandingsError,
    StandingsTable,
};

/// Runs standings recomputes and the team registration that feeds them.
///
/// A recompute reads a fresh snapshot of teams, played matches and scoring
/// rules, runs the engine and replaces the stored table. All of that happens
/// while holding the competition's lock, so two recomputes of one competition
/// never interleave their writes.
pub struct StandingsService {
    repository: Arc<dyn StandingsRepository>,
    matches: Arc<dyn MatchRepository>,
    competitions: Arc<dyn CompetitionRepository>,
    sports: Arc<dyn SportRepository>,
    competition_locks: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl StandingsService {
    pub fn new(
        repository: Arc<dyn StandingsRepository>,
        matches: Arc<dyn MatchRepository>,
        competitions: Arc<dyn CompetitionRepository>,
        sports: Arc<dyn SportRepository>,
    ) -> Self {
        Self {
            repository,
            matches,
            competitions,
            sports,
            competition_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fully recomputes and stores the standings of a competition
    #[instrument(skip(self))]
    pub async fn recompute(&self, competition_id: &str) -> Result<StandingsTable, StandingsError> {
        let lock = self.competition_lock(competition_id).await;
        let _guard = lock.lock().await;

        let competition = self.load_competition(competition_id).await?;
        self.recompute_locked(&competition).await
    }

    /// Registers a team and recomputes so it receives a position
    #[instrument(skip(self))]
    pub async fn add_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<StandingsTable, StandingsError> {
        let team = team.trim();
        if team.is_empty() {
            return Err(StandingsError::Validation(
                "team name must not be empty".to_string(),
            ));
        }

        let lock = self.competition_lock(competition_id).await;
        let _guard = lock.lock().await;

        let competition = self.load_competition(competition_id).await?;

        let registered = self.repository.list_teams(competition_id).await?;
        if registered.iter().any(|t| t == team) {
            return Err(StandingsError::TeamAlreadyRegistered {
                competition_id: competition_id.to_string(),
                team: team.to_string(),
            });
        }
        if let Some(max_teams) = competition.max_teams {
            if registered.len() >= max_teams as usize {
                return Err(StandingsError::CompetitionFull(competition_id.to_string()));
            }
        }

        self.repository.register_team(competition_id, team).await?;
        info!(competition_id = %competition_id, team = %team, "Team added to competition");

        self.recompute_locked(&competition).await
    }

    /// Unregisters a team, dropping its row, and re-ranks the rest
    #[instrument(skip(self))]
    pub async fn remove_team(
        &self,
        competition_id: &str,
        team: &str,
    ) -> Result<StandingsTable, StandingsError> {
        let team = team.trim();
        let lock = self.competition_lock(competition_id).await;
        let _guard = lock.lock().await;

        let competition = self.load_competition(competition_id).await?;

        self.repository.unregister_team(competition_id, team).await?;
        info!(competition_id = %competition_id, team = %team, "Team removed from competition");

        self.recompute_locked(&competition).await
    }

    /// Current stored rows, ranked first
    #[instrument(skip(self))]
    pub async fn standings(&self, competition_id: &str) -> Result<Vec<StandingRow>, StandingsError> {
        self.load_competition(competition_id).await?;
        self.repository.list_standings(competition_id).await
    }

    /// Drops every team and row of a competition whose record is already gone.
    ///
    /// Callers delete the competition first, so anything queued on the lock
    /// fails to load it instead of registering into the cleared table.
    #[instrument(skip(self))]
    pub async fn clear_competition(&self, competition_id: &str) -> Result<(), StandingsError> {
        {
            let lock = self.competition_lock(competition_id).await;
            let _guard = lock.lock().await;
            self.repository.clear_competition(competition_id).await?;
        }
        self.clear_competition_lock(competition_id).await;
        Ok(())
    }

    /// Rules of a competition: its own override, else its sport's rules
    pub async fn scoring_config(
        &self,
        competition: &CompetitionModel,
    ) -> Result<ScoringConfig, StandingsError> {
        if let Some(custom) = competition.custom_scoring {
            return Ok(custom);
        }

        self.sports
            .get_sport(&competition.sport_id)
            .await?
            .map(|sport| sport.classification_rules)
            .ok_or_else(|| StandingsError::MissingScoringConfig(competition.id.clone()))
    }

    async fn recompute_locked(
        &self,
        competition: &CompetitionModel,
    ) -> Result<StandingsTable, StandingsError> {
        let config = self.scoring_config(competition).await?;
        let teams = self.repository.list_teams(&competition.id).await?;
        let results: Vec<_> = self
            .matches
            .list_played(&competition.id)
            .await?
            .iter()
            .filter_map(|m| m.result())
            .collect();

        debug!(
            competition_id = %competition.id,
            teams = teams.len(),
            played_matches = results.len(),
            "Recomputing standings"
        );

        let table = engine::recompute(&competition.id, &results, &teams, &config);
        self.repository
            .replace_standings(&competition.id, &table.rows)
            .await?;

        info!(
            competition_id = %competition.id,
            rows = table.rows.len(),
            rejected_matches = table.rejected.len(),
            "Standings recomputed"
        );

        Ok(table)
    }

    async fn load_competition(
        &self,
        competition_id: &str,
    ) -> Result<CompetitionModel, StandingsError> {
        self.competitions
            .get_competition(competition_id)
            .await?
            .ok_or_else(|| StandingsError::CompetitionNotFound(competition_id.to_string()))
    }

    async fn competition_lock(&self, competition_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.competition_locks.read().await;
            if let Some(lock) = guard.get(competition_id) {
                return lock.clone();
            }
        }

        let mut guard = self.competition_locks.write().await;
        guard
            .entry(competition_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    async fn clear_competition_lock(&self, competition_id: &str) {
        let mut guard = self.competition_locks.write().await;
        guard.remove(competition_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        competition::repository::InMemoryCompetitionRepository,
        matches::{models::MatchModel, repository::InMemoryMatchRepository},
        sport::{models::SportModel, repository::InMemorySportRepository},
        standings::repository::InMemoryStandingsRepository,
    };
    use chrono::Utc;

    struct Fixture {
        service: Arc<StandingsService>,
        matches: Arc<InMemoryMatchRepository>,
        competitions: Arc<InMemoryCompetitionRepository>,
        competition_id: String,
    }

    async fn fixture(custom_scoring: Option<ScoringConfig>, max_teams: Option<i32>) -> Fixture {
        let sports = Arc::new(InMemorySportRepository::new());
        let competitions = Arc::new(InMemoryCompetitionRepository::new());
        let matches = Arc::new(InMemoryMatchRepository::new());
        let standings = Arc::new(InMemoryStandingsRepository::new());

        let sport = SportModel::new("Football".to_string(), ScoringConfig::default());
        sports.create_sport(&sport).await.unwrap();

        let mut competition = CompetitionModel::new("Spring Cup".to_string(), sport.id.clone(), Utc::now());
        competition.custom_scoring = custom_scoring;
        competition.max_teams = max_teams;
        competitions.create_competition(&competition).await.unwrap();

        let service = Arc::new(StandingsService::new(
            standings,
            matches.clone(),
            competitions.clone(),
            sports,
        ));

        Fixture {
            service,
            matches,
            competitions,
            competition_id: competition.id,
        }
    }

    async fn played(fixture: &Fixture, home: &str, away: &str, home_score: i32, away_score: i32) {
        let mut m = MatchModel::new(
            fixture.competition_id.clone(),
            home.to_string(),
            away.to_string(),
            Utc::now(),
        );
        m.record_result(home_score, away_score);
        fixture.matches.create_match(&m).await.unwrap();
    }

    #[tokio::test]
    async fn add_team_assigns_position() {
        let f = fixture(None, None).await;

        let table = f.service.add_team(&f.competition_id, "Lions").await.unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].position, Some(1));
    }

    #[tokio::test]
    async fn add_team_trims_and_rejects_blank_names() {
        let f = fixture(None, None).await;

        let table = f.service.add_team(&f.competition_id, "  Lions ").await.unwrap();
        assert_eq!(table.rows[0].team, "Lions");

        let blank = f.service.add_team(&f.competition_id, "   ").await;
        assert!(matches!(blank, Err(StandingsError::Validation(_))));
    }

    #[tokio::test]
    async fn add_team_to_missing_competition_fails() {
        let f = fixture(None, None).await;
        let result = f.service.add_team("nope", "Lions").await;
        assert!(matches!(result, Err(StandingsError::CompetitionNotFound(_))));
    }

    #[tokio::test]
    async fn add_team_respects_max_teams() {
        let f = fixture(None, Some(2)).await;
        f.service.add_team(&f.competition_id, "A").await.unwrap();
        f.service.add_team(&f.competition_id, "B").await.unwrap();

        let result = f.service.add_team(&f.competition_id, "C").await;
        assert!(matches!(result, Err(StandingsError::CompetitionFull(_))));
    }

    #[tokio::test]
    async fn re_adding_a_team_to_a_full_competition_reports_duplicate() {
        let f = fixture(None, Some(1)).await;
        f.service.add_team(&f.competition_id, "A").await.unwrap();

        let result = f.service.add_team(&f.competition_id, " A").await;
        assert!(matches!(
            result,
            Err(StandingsError::TeamAlreadyRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn remove_team_trims_the_name() {
        let f = fixture(None, None).await;
        f.service.add_team(&f.competition_id, " Lions").await.unwrap();

        let table = f.service.remove_team(&f.competition_id, "Lions  ").await.unwrap();
        assert!(table.rows.is_empty());
    }

    #[tokio::test]
    async fn recompute_uses_sport_rules_and_persists() {
        let f = fixture(None, None).await;
        f.service.add_team(&f.competition_id, "A").await.unwrap();
        f.service.add_team(&f.competition_id, "B").await.unwrap();
        played(&f, "A", "B", 2, 1).await;

        let table = f.service.recompute(&f.competition_id).await.unwrap();
        assert_eq!(table.rows[0].team, "A");
        assert_eq!(table.rows[0].points, 3.0);

        let stored = f.service.standings(&f.competition_id).await.unwrap();
        assert_eq!(stored, table.rows);
    }

    #[tokio::test]
    async fn competition_override_beats_sport_rules() {
        let f = fixture(Some(ScoringConfig::new(2.0, 1.0, 0.0)), None).await;
        f.service.add_team(&f.competition_id, "A").await.unwrap();
        f.service.add_team(&f.competition_id, "B").await.unwrap();
        played(&f, "A", "B", 3, 0).await;

        let table = f.service.recompute(&f.competition_id).await.unwrap();
        assert_eq!(table.rows[0].points, 2.0);
    }

    #[tokio::test]
    async fn missing_sport_is_a_hard_failure() {
        let f = fixture(None, None).await;
        let mut competition = f
            .competitions
            .get_competition(&f.competition_id)
            .await
            .unwrap()
            .unwrap();
        competition.sport_id = "deleted-sport".to_string();
        f.competitions.update_competition(&competition).await.unwrap();

        let result = f.service.recompute(&f.competition_id).await;
        assert!(matches!(result, Err(StandingsError::MissingScoringConfig(_))));
    }

    #[tokio::test]
    async fn unplayed_matches_are_ignored() {
        let f = fixture(None, None).await;
        f.service.add_team(&f.competition_id, "A").await.unwrap();
        f.service.add_team(&f.competition_id, "B").await.unwrap();
        let scheduled = MatchModel::new(
            f.competition_id.clone(),
            "A".to_string(),
            "B".to_string(),
            Utc::now(),
        );
        f.matches.create_match(&scheduled).await.unwrap();

        let table = f.service.recompute(&f.competition_id).await.unwrap();
        assert!(table.rows.iter().all(|r| r.played == 0));
    }

    #[tokio::test]
    async fn remove_team_re_ranks_densely() {
        let f = fixture(None, None).await;
        for team in ["A", "B", "C"] {
            f.service.add_team(&f.competition_id, team).await.unwrap();
        }
        played(&f, "C", "B", 1, 0).await;
        f.service.recompute(&f.competition_id).await.unwrap();

        let table = f.service.remove_team(&f.competition_id, "C").await.unwrap();

        let positions: Vec<Option<i32>> = table.rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![Some(1), Some(2)]);
        assert!(table.rows.iter().all(|r| r.team != "C"));
    }

    #[tokio::test]
    async fn concurrent_recomputes_leave_consistent_table() {
        let f = fixture(None, None).await;
        for team in ["A", "B", "C", "D"] {
            f.service.add_team(&f.competition_id, team).await.unwrap();
        }
        played(&f, "A", "B", 1, 0).await;
        played(&f, "C", "D", 2, 2).await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = f.service.clone();
                let id = f.competition_id.clone();
                tokio::spawn(async move { service.recompute(&id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = f.service.standings(&f.competition_id).await.unwrap();
        assert_eq!(stored.len(), 4);
        let positions: Vec<Option<i32>> = stored.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[tokio::test]
    async fn clear_competition_drops_standings() {
        let f = fixture(None, None).await;
        f.service.add_team(&f.competition_id, "A").await.unwrap();

        f.service.clear_competition(&f.competition_id).await.unwrap();

        assert!(f.service.standings(&f.competition_id).await.unwrap().is_empty());
    }
}
