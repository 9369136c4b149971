//! Standings computation.
//!
//! [`recompute`] turns the played matches of one competition, its registered
//! teams and a scoring configuration into a fully ordered table. It holds no
//! state between calls: every invocation builds its own accumulators and
//! throws them away once the rows are produced.

use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::models::{
    MatchResult, Outcome, RejectedMatch, RejectionReason, ScoringConfig, StandingRow,
    StandingsTable,
};

/// Running tally for one team during a single recompute pass
#[derive(Debug)]
struct Accumulator<'a> {
    team: &'a str,
    points: f64,
    wins: i32,
    draws: i32,
    losses: i32,
    goals_for: i32,
    goals_against: i32,
}

impl<'a> Accumulator<'a> {
    fn new(team: &'a str) -> Self {
        Self {
            team,
            points: 0.0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    fn tally(&mut self, own: i32, opponent: i32, config: &ScoringConfig) {
        let outcome = Outcome::from_scores(own, opponent);
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.goals_for += own;
        self.goals_against += opponent;
        self.points += config.points_for(outcome);
    }

    fn can_absorb(&self, own: i32, opponent: i32) -> bool {
        self.goals_for.checked_add(own).is_some()
            && self.goals_against.checked_add(opponent).is_some()
    }

    fn goal_difference(&self) -> i32 {
        self.goals_for - self.goals_against
    }

    fn into_row(self, competition_id: &str, position: i32) -> StandingRow {
        StandingRow {
            competition_id: competition_id.to_string(),
            team: self.team.to_string(),
            position: Some(position),
            points: self.points,
            played: self.wins + self.draws + self.losses,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
        }
    }
}

/// Ranking comparator: points descending, then goal difference descending.
///
/// No third key: rows equal on both compare as `Equal`, so a stable sort
/// leaves them in registration order.
pub fn ranking_order(
    (a_points, a_goal_difference): (f64, i32),
    (b_points, b_goal_difference): (f64, i32),
) -> Ordering {
    b_points
        .total_cmp(&a_points)
        .then_with(|| b_goal_difference.cmp(&a_goal_difference))
}

fn rejection_reason(result: &MatchResult) -> Option<RejectionReason> {
    if result.home_score < 0 || result.away_score < 0 {
        Some(RejectionReason::NegativeScore)
    } else if result.home_team == result.away_team {
        Some(RejectionReason::SameTeam)
    } else {
        None
    }
}

fn reject(competition_id: &str, result: &MatchResult, reason: RejectionReason) -> RejectedMatch {
    warn!(
        competition_id = %competition_id,
        match_id = %result.match_id,
        reason = %reason,
        "Excluding match from standings"
    );
    RejectedMatch {
        match_id: result.match_id.clone(),
        reason,
    }
}

/// Computes a fresh standings table for one competition.
///
/// * every team in `teams` gets exactly one row, played or not; repeated
///   identifiers collapse onto their first occurrence
/// * a match side naming an unregistered team is skipped, the other side
///   still counts
/// * matches with a negative score, with the same team on both sides, or whose
///   goals would overflow a team's totals are left out and listed in
///   [`StandingsTable::rejected`]
/// * positions are dense and 1-based
pub fn recompute(
    competition_id: &str,
    matches: &[MatchResult],
    teams: &[String],
    config: &ScoringConfig,
) -> StandingsTable {
    let mut accumulators: Vec<Accumulator> = Vec::with_capacity(teams.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(teams.len());

    for team in teams {
        if !index.contains_key(team.as_str()) {
            index.insert(team.as_str(), accumulators.len());
            accumulators.push(Accumulator::new(team.as_str()));
        }
    }

    let mut rejected = Vec::new();

    for result in matches {
        if let Some(reason) = rejection_reason(result) {
            rejected.push(reject(competition_id, result, reason));
            continue;
        }

        let home = index.get(result.home_team.as_str()).copied();
        let away = index.get(result.away_team.as_str()).copied();

        let fits = |side: Option<usize>, own: i32, opponent: i32| {
            side.map_or(true, |i| accumulators[i].can_absorb(own, opponent))
        };
        let overflows = !fits(home, result.home_score, result.away_score)
            || !fits(away, result.away_score, result.home_score);
        if overflows {
            rejected.push(reject(competition_id, result, RejectionReason::ScoreOverflow));
            continue;
        }

        match home {
            Some(i) => accumulators[i].tally(result.home_score, result.away_score, config),
            None => debug!(
                competition_id = %competition_id,
                match_id = %result.match_id,
                team = %result.home_team,
                "Home team not registered, skipping its side"
            ),
        }
        match away {
            Some(i) => accumulators[i].tally(result.away_score, result.home_score, config),
            None => debug!(
                competition_id = %competition_id,
                match_id = %result.match_id,
                team = %result.away_team,
                "Away team not registered, skipping its side"
            ),
        }
    }

    // sort_by is stable: ties keep registration order
    accumulators.sort_by(|a, b| {
        ranking_order(
            (a.points, a.goal_difference()),
            (b.points, b.goal_difference()),
        )
    });

    let rows = accumulators
        .into_iter()
        .enumerate()
        .map(|(i, acc)| acc.into_row(competition_id, i as i32 + 1))
        .collect();

    StandingsTable {
        competition_id: competition_id.to_string(),
        rows,
        rejected,
    }
}
