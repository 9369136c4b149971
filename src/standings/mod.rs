// Public API - what other modules can use
pub use errors::StandingsError;
pub use handlers::{add_team, get_standings, recompute_standings, remove_team};
pub use models::*;
pub use repository::{InMemoryStandingsRepository, StandingsRepository};
pub use service::StandingsService;

// Internal modules
pub mod engine;
mod errors;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
