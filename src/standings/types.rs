use serde::{Deserialize, Serialize};

use super::{RejectedMatch, StandingRow, StandingsTable};

/// Request payload for registering a team in a competition
#[derive(Debug, Deserialize)]
pub struct AddTeamRequest {
    pub team_name: String,
}

/// One line of the standings table as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandingResponse {
    pub position: Option<i32>,
    pub team: String,
    pub points: f64,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
}

impl From<StandingRow> for StandingResponse {
    fn from(row: StandingRow) -> Self {
        Self {
            position: row.position,
            goal_difference: row.goal_difference(),
            team: row.team,
            points: row.points,
            played: row.played,
            wins: row.wins,
            draws: row.draws,
            losses: row.losses,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub competition_id: String,
    pub rows: Vec<StandingResponse>,
    /// Match ids left out of the last recompute, with the reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_matches: Vec<RejectedMatchResponse>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RejectedMatchResponse {
    pub match_id: String,
    pub reason: String,
}

impl From<RejectedMatch> for RejectedMatchResponse {
    fn from(rejected: RejectedMatch) -> Self {
        Self {
            match_id: rejected.match_id,
            reason: rejected.reason.to_string(),
        }
    }
}

impl StandingsResponse {
    pub fn from_rows(competition_id: &str, rows: Vec<StandingRow>) -> Self {
        Self {
            competition_id: competition_id.to_string(),
            rows: rows.into_iter().map(StandingResponse::from).collect(),
            rejected_matches: Vec::new(),
        }
    }
}

impl From<StandingsTable> for StandingsResponse {
    fn from(table: StandingsTable) -> Self {
        Self {
            competition_id: table.competition_id,
            rows: table.rows.into_iter().map(StandingResponse::from).collect(),
            rejected_matches: table
                .rejected
                .into_iter()
                .map(RejectedMatchResponse::from)
                .collect(),
        }
    }
}
