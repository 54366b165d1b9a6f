//! Library catalog server
//!
//! REST JSON API over authors, books and tags stored in PostgreSQL, plus an
//! HTTP client that front ends use to talk to it.

use std::sync::Arc;

pub mod api;
pub mod client;
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

impl AppState {
    pub fn new(services: services::Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}
