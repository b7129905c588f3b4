//! Readery Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use auth::AuthProvider;
use email::Mailer;

/// Application state shared across all handlers
///
/// The store handle is the only shared mutable resource; the auth and mail
/// collaborators are injected as trait objects so tests can substitute
/// fakes.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub auth: Arc<dyn AuthProvider>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create a new AppState with the given database, configuration and collaborators
    pub fn new(
        db: Db,
        config: Config,
        auth: Arc<dyn AuthProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            config,
            auth,
            mailer,
        }
    }
}

/// Build the application router
///
/// The binary and the integration tests assemble the same app through this
/// function.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/category", get(routes::list_categories))
        .route(
            "/api/articles",
            post(routes::create_article)
                .get(routes::page_articles)
                .delete(routes::delete_articles),
        )
        .route("/api/articles/latest", get(routes::latest_articles))
        .route("/api/articles/hottest", get(routes::hottest_articles))
        .route("/api/articles/search", get(routes::search_articles))
        .route("/api/articles/admin", get(routes::admin_articles))
        .route(
            "/api/articles/:id",
            get(routes::get_article)
                .put(routes::update_article)
                .delete(routes::delete_article),
        )
        .route("/api/user/mark/:article_id", post(routes::toggle_mark))
        .route("/api/user/read/:article_id", post(routes::increment_read))
        .route("/api/user/stats/:article_id", get(routes::article_stats))
        .route(
            "/api/user/collection/marked",
            get(routes::marked_collection),
        )
        .route("/api/user/collection/history", get(routes::read_history))
        .route(
            "/api/user/profile",
            get(routes::get_profile).patch(routes::update_profile),
        )
        .route("/api/auth/otp/request", post(routes::request_otp))
        .route("/api/auth/otp/verify", post(routes::verify_otp))
        .route(
            "/api/auth/reset-password/request",
            post(routes::request_password_reset),
        )
        .with_state(state)
}
