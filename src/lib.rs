// Library crate for the tournament standings server
// This file exposes the public API for integration tests

pub mod competition;
pub mod config;
pub mod matches;
pub mod routes;
pub mod shared;
pub mod sport;
pub mod standings;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ConfigError};
pub use routes::router;
pub use shared::{AppError, AppState};
pub use standings::{
    engine::recompute, MatchResult, ScoringConfig, StandingRow, StandingsService, StandingsTable,
};
