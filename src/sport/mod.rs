// Public API - what other modules can use
pub use handlers::{create_sport, delete_sport, get_sport, list_sports, update_sport};
pub use seed::seed_default_sports;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod seed;
pub mod service;
pub mod types;
