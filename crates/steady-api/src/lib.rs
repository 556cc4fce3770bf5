//! JSON REST API for Steady.
//!
//! Exposes an axum [`Router`] backed by any
//! [`steady_core::store::RecoveryStore`]. All routes except
//! `POST /api/auth/login` require a bearer token issued by the login
//! endpoint.

pub mod achievements;
pub mod auth;
pub mod error;
pub mod exercises;
pub mod extract;
pub mod journals;
pub mod sobriety;
pub mod triggers;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use serde::Deserialize;
use steady_core::store::RecoveryStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use auth::TokenConfig;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   std::path::PathBuf,
  /// HMAC secret for signing session tokens.
  pub token_secret: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RecoveryStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the `/api` route tree for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecoveryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    // Sobriety
    .route(
      "/sobriety",
      get(sobriety::get_log::<S>).post(sobriety::upsert_log::<S>),
    )
    .route("/sobriety/relapse", post(sobriety::record_relapse::<S>))
    // Triggers
    .route(
      "/triggers",
      get(triggers::list::<S>).post(triggers::create::<S>),
    )
    .route(
      "/triggers/{id}",
      put(triggers::update::<S>).delete(triggers::delete::<S>),
    )
    // Journal
    .route(
      "/journals",
      get(journals::list::<S>).post(journals::create::<S>),
    )
    .route("/journals/{id}", delete(journals::delete::<S>))
    // CBT exercises
    .route("/cbt", get(exercises::list::<S>).post(exercises::create::<S>))
    // Achievements
    .route("/achievements", get(achievements::list::<S>))
    .with_state(state)
}

/// Full application router: `/api` tree plus request tracing.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecoveryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
