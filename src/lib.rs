//! Bookshelf book request server
//!
//! REST JSON API letting library users request books that are missing from
//! the catalog. Duplicate requests are aggregated on the normalized title and
//! author and ranked by how many distinct users asked for them.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
