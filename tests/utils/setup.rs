use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use tourney::{
    competition::{models::CompetitionModel, repository::CompetitionRepository},
    matches::types::CreateMatchRequest,
    router,
    sport::{models::SportModel, repository::SportRepository},
    AppState, ScoringConfig, StandingRow,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub app: Router,
    pub sport_id: String,
    pub competition_id: String,
}

pub struct TestSetupBuilder {
    teams: Vec<String>,
    sport_rules: ScoringConfig,
    custom_scoring: Option<ScoringConfig>,
    max_teams: Option<i32>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            teams: vec![],
            sport_rules: ScoringConfig::default(),
            custom_scoring: None,
            max_teams: None,
        }
    }

    pub fn with_teams(mut self, teams: Vec<&str>) -> Self {
        self.teams = teams.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_sport_rules(mut self, rules: ScoringConfig) -> Self {
        self.sport_rules = rules;
        self
    }

    #[allow(dead_code)]
    pub fn with_custom_scoring(mut self, rules: ScoringConfig) -> Self {
        self.custom_scoring = Some(rules);
        self
    }

    #[allow(dead_code)]
    pub fn with_max_teams(mut self, max_teams: i32) -> Self {
        self.max_teams = Some(max_teams);
        self
    }

    pub async fn build(self) -> TestSetup {
        let state = AppState::in_memory();

        let sport = SportModel::new("Test Sport".to_string(), self.sport_rules);
        state.sport_repository.create_sport(&sport).await.unwrap();

        let mut competition =
            CompetitionModel::new("Test League".to_string(), sport.id.clone(), Utc::now());
        competition.custom_scoring = self.custom_scoring;
        competition.max_teams = self.max_teams;
        state
            .competition_repository
            .create_competition(&competition)
            .await
            .unwrap();

        for team in &self.teams {
            state
                .standings_service
                .add_team(&competition.id, team)
                .await
                .unwrap();
        }

        TestSetup {
            app: router(state.clone()),
            state,
            sport_id: sport.id,
            competition_id: competition.id,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSetup {
    /// Records a finished match through the match service; returns its id
    pub async fn play(&self, home: &str, away: &str, home_score: i32, away_score: i32) -> String {
        let request = CreateMatchRequest {
            home_team: home.to_string(),
            away_team: away.to_string(),
            scheduled_at: None,
            status: None,
            home_score: Some(home_score),
            away_score: Some(away_score),
            notes: None,
        };
        self.state
            .match_service()
            .create_match(&self.competition_id, request)
            .await
            .unwrap()
            .id
    }

    pub async fn standings(&self) -> Vec<StandingRow> {
        self.state
            .standings_service
            .standings(&self.competition_id)
            .await
            .unwrap()
    }

    /// Sends one request through the full router and decodes the JSON body
    #[allow(dead_code)]
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
