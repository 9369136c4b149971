// Public API - what other modules can use
pub use handlers::{
    create_match, delete_match, get_match, list_matches, record_result, update_match,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
