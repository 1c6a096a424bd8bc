//! JSON API for Marks.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! `marks-core` traits. Request parsing and response serialisation live
//! here; identity resolution, lifecycle rules, and presentation policy
//! are all delegated downward.

pub mod accounts;
pub mod error;
pub mod extract;
pub mod items;
pub mod profiles;
pub mod settings;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use marks_auth::Authenticator;
use marks_core::store::{CredentialStore, ItemStore};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Secret keying the session-token HMAC. Injected from configuration;
  /// nothing in the process holds it globally.
  pub session_secret:   String,
  /// Token validity window override, in days. Defaults to five years.
  pub session_ttl_days: Option<i64>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub auth:   Arc<Authenticator>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the Marks API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Accounts and sessions
    .route("/accounts", post(accounts::register::<S>))
    .route(
      "/sessions",
      post(accounts::login::<S>).delete(accounts::logout),
    )
    // Settings
    .route("/settings", put(settings::update::<S>))
    // Items
    .route("/items", get(items::list::<S>).post(items::create::<S>))
    .route("/items/{id}", post(items::edit::<S>))
    // Public profiles
    .route("/u/{username}", get(profiles::show::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
