use tracing::{debug, info, instrument};

use super::{
    models::{ActivityCategory, SportModel},
    repository::SportRepository,
};
use crate::{shared::AppError, standings::ScoringConfig};

struct DefaultSport {
    name: &'static str,
    category: ActivityCategory,
    rules: (f64, f64, f64),
    metrics: &'static [&'static str],
}

const DEFAULT_SPORTS: &[DefaultSport] = &[
    DefaultSport {
        name: "Football",
        category: ActivityCategory::Sport,
        rules: (3.0, 1.0, 0.0),
        metrics: &["wins", "draws", "losses", "goals_for", "goals_against"],
    },
    DefaultSport {
        name: "Basketball",
        category: ActivityCategory::Sport,
        rules: (2.0, 0.0, 0.0),
        metrics: &["wins", "losses", "points_scored", "points_conceded"],
    },
    DefaultSport {
        name: "Tennis",
        category: ActivityCategory::Sport,
        rules: (1.0, 0.0, 0.0),
        metrics: &["wins", "losses", "sets_won", "sets_lost"],
    },
    DefaultSport {
        name: "Volleyball",
        category: ActivityCategory::Sport,
        rules: (2.0, 0.0, 0.0),
        metrics: &["wins", "losses", "sets_won", "sets_lost"],
    },
    DefaultSport {
        name: "Swimming",
        category: ActivityCategory::Sport,
        rules: (1.0, 0.0, 0.0),
        metrics: &["wins", "best_time"],
    },
    DefaultSport {
        name: "Chess",
        category: ActivityCategory::BoardGame,
        rules: (1.0, 0.5, 0.0),
        metrics: &["wins", "draws", "losses"],
    },
    DefaultSport {
        name: "Dominoes",
        category: ActivityCategory::BoardGame,
        rules: (1.0, 0.0, 0.0),
        metrics: &["wins", "losses", "points_scored"],
    },
    DefaultSport {
        name: "League of Legends",
        category: ActivityCategory::Esport,
        rules: (1.0, 0.0, 0.0),
        metrics: &["wins", "losses", "kills", "deaths"],
    },
    DefaultSport {
        name: "eFootball",
        category: ActivityCategory::Esport,
        rules: (3.0, 1.0, 0.0),
        metrics: &["wins", "draws", "losses", "goals_for", "goals_against"],
    },
    DefaultSport {
        name: "Valorant",
        category: ActivityCategory::Esport,
        rules: (1.0, 0.0, 0.0),
        metrics: &["wins", "losses", "rounds_won", "rounds_lost"],
    },
    DefaultSport {
        name: "Competitive RPG",
        category: ActivityCategory::TabletopRpg,
        rules: (1.0, 0.0, 0.0),
        metrics: &["wins", "losses"],
    },
];

/// Inserts every built-in sport missing from the repository.
///
/// Returns how many were created; existing entries are left untouched.
#[instrument(skip(repository))]
pub async fn seed_default_sports(repository: &dyn SportRepository) -> Result<usize, AppError> {
    let mut created = 0;

    for default in DEFAULT_SPORTS {
        if repository.find_by_name(default.name).await?.is_some() {
            debug!(name = default.name, "Built-in sport already present");
            continue;
        }

        let (win, draw, loss) = default.rules;
        let mut sport = SportModel::new(
            default.name.to_string(),
            ScoringConfig::new(win, draw, loss),
        );
        sport.category = default.category;
        sport.is_custom = false;
        sport.tracked_metrics = default.metrics.iter().map(|m| m.to_string()).collect();

        repository.create_sport(&sport).await?;
        created += 1;
    }

    info!(created, total = DEFAULT_SPORTS.len(), "Built-in sports seeded");
    Ok(created)
}
