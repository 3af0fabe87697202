//! Librarium Library Catalog Server
//!
//! A Rust implementation of a small library catalog: browsable records for
//! authors, books, genres, and book copies, with integrity-checked
//! create/update/delete workflows over a Postgres store.

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
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
