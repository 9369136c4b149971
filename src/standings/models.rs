use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::StandingsError;

/// Points awarded for each match outcome.
///
/// Values may be fractional (chess awards half a point for a draw).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub points_for_win: f64,
    pub points_for_draw: f64,
    pub points_for_loss: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(3.0, 1.0, 0.0)
    }
}

impl ScoringConfig {
    pub fn new(points_for_win: f64, points_for_draw: f64, points_for_loss: f64) -> Self {
        Self {
            points_for_win,
            points_for_draw,
            points_for_loss,
        }
    }

    pub fn points_for(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Win => self.points_for_win,
            Outcome::Draw => self.points_for_draw,
            Outcome::Loss => self.points_for_loss,
        }
    }

    /// Checks `win >= draw >= loss >= 0` with every value finite.
    ///
    /// Applied when a sport or competition override is saved; the engine
    /// itself trusts whatever configuration it is handed.
    pub fn validate(&self) -> Result<(), StandingsError> {
        let values = [
            ("points_for_win", self.points_for_win),
            ("points_for_draw", self.points_for_draw),
            ("points_for_loss", self.points_for_loss),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(StandingsError::InvalidScoringConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.points_for_win < self.points_for_draw {
            return Err(StandingsError::InvalidScoringConfig(
                "points_for_win must not be lower than points_for_draw".to_string(),
            ));
        }
        if self.points_for_draw < self.points_for_loss {
            return Err(StandingsError::InvalidScoringConfig(
                "points_for_draw must not be lower than points_for_loss".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Outcome from one side's point of view
    pub fn from_scores(own: i32, opponent: i32) -> Self {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

/// A played match as consumed by the engine: both scores are known.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
}

impl MatchResult {
    pub fn new(
        match_id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_score: i32,
        away_score: i32,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score,
            away_score,
        }
    }
}

/// One team's row in a competition's standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub competition_id: String,
    pub team: String,
    /// 1-based rank; `None` until the first recompute after the team was added
    pub position: Option<i32>,
    pub points: f64,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
}

impl StandingRow {
    /// Row for a freshly registered team, before any recompute
    pub fn unranked(competition_id: &str, team: &str) -> Self {
        Self {
            competition_id: competition_id.to_string(),
            team: team.to_string(),
            position: None,
            points: 0.0,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for - self.goals_against
    }

    pub fn is_ranked(&self) -> bool {
        self.position.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    NegativeScore,
    SameTeam,
    /// Adding the match would overflow a team's goal totals
    ScoreOverflow,
}

/// A played match the engine refused to aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedMatch {
    pub match_id: String,
    pub reason: RejectionReason,
}

/// Output of one recompute: every registered team in rank order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsTable {
    pub competition_id: String,
    pub rows: Vec<StandingRow>,
    pub rejected: Vec<RejectedMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ScoringConfig::new(3.0, 1.0, 0.0))]
    #[case(ScoringConfig::new(1.0, 0.5, 0.0))]
    #[case(ScoringConfig::new(2.0, 0.0, 0.0))]
    #[case(ScoringConfig::new(1.0, 1.0, 1.0))]
    fn accepts_monotonic_configs(#[case] config: ScoringConfig) {
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(ScoringConfig::new(1.0, 3.0, 0.0))] // draw beats win
    #[case(ScoringConfig::new(3.0, 0.0, 1.0))] // loss beats draw
    #[case(ScoringConfig::new(3.0, 1.0, -1.0))]
    #[case(ScoringConfig::new(f64::NAN, 1.0, 0.0))]
    #[case(ScoringConfig::new(f64::INFINITY, 1.0, 0.0))]
    fn rejects_invalid_configs(#[case] config: ScoringConfig) {
        assert!(matches!(
            config.validate(),
            Err(StandingsError::InvalidScoringConfig(_))
        ));
    }

    #[rstest]
    #[case(2, 1, Outcome::Win)]
    #[case(1, 1, Outcome::Draw)]
    #[case(0, 4, Outcome::Loss)]
    fn outcome_follows_score_comparison(
        #[case] own: i32,
        #[case] opponent: i32,
        #[case] expected: Outcome,
    ) {
        assert_eq!(Outcome::from_scores(own, opponent), expected);
    }

    #[test]
    fn unranked_row_starts_empty() {
        let row = StandingRow::unranked("cup", "Lions");
        assert!(!row.is_ranked());
        assert_eq!(row.points, 0.0);
        assert_eq!(row.goal_difference(), 0);
    }

    #[test]
    fn rejection_reason_displays_as_screaming_snake_case() {
        assert_eq!(RejectionReason::NegativeScore.to_string(), "NEGATIVE_SCORE");
    }
}
