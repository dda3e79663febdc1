//! Library Catalogue
//!
//! A small library web application: visitors browse a paginated catalogue,
//! sign up and reserve books; the administrator manages users, books and the
//! checkout / return workflow. Pages are rendered on the server and
//! authentication is session based.

use std::sync::Arc;

pub mod api;
pub mod authorization;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;
pub mod session;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub sessions: Arc<dyn session::SessionStore>,
}
