// Public API - what other modules can use
pub use handlers::{
    create_competition, delete_competition, get_competition, list_competitions,
    update_competition, update_competition_status,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
