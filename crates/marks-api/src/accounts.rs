//! Handlers for account registration and sessions.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/accounts` | Register; returns 201 + a fresh token |
//! | `POST`   | `/sessions` | Credential login; returns a fresh token |
//! | `DELETE` | `/sessions` | Logout (advisory — tokens are stateless) |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use marks_auth::{Credentials, password::hash_password};
use marks_core::{
  clock::now_millis,
  identity::NewIdentity,
  profile::NewProfile,
  store::{CredentialStore, ItemStore},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, extract::CurrentUser};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
  pub username: String,
  pub token:    String,
}

/// `POST /accounts` — body: `{"username":"...","password":"..."}`.
///
/// Successful registration logs the user straight in: the response token
/// is usable immediately.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  if body.password.is_empty() {
    return Err(ApiError::Validation(marks_core::Error::MissingField(
      "password",
    )));
  }

  let now = now_millis();

  let hash = hash_password(&body.password)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let input = NewIdentity::build(&body.username, hash, now)?;

  // Friendlier duplicate detection than the unique index alone; a racing
  // registration still dies on the index and surfaces as a store fault.
  if state
    .store
    .find_identity(&input.username)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::BadRequest(format!(
      "username {:?} is already taken",
      input.username
    )));
  }

  let identity = state
    .store
    .add_identity(input)
    .await
    .map_err(ApiError::store)?;

  // Every identity gets an empty public profile shell.
  state
    .store
    .save_profile(NewProfile::empty(
      identity.identity_id,
      identity.username.clone(),
      now,
    ))
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(username = %identity.username, "account created");

  let token = state.auth.signer().mint(&identity.username, now);
  Ok((
    StatusCode::CREATED,
    Json(SessionResponse { username: identity.username, token }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /sessions` — credential login.
///
/// On success mints a fresh signed token with the configured validity
/// window and records the login instant.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  let now = now_millis();

  let identity = state
    .auth
    .authenticate(
      state.store.as_ref(),
      &Credentials::from_pair(body.username, body.password),
      now,
    )
    .await
    .map_err(|_| ApiError::Unauthorized)?;

  state
    .store
    .touch_last_login(identity.identity_id, now)
    .await
    .map_err(ApiError::store)?;

  let token = state.auth.signer().mint(&identity.username, now);
  Ok(Json(SessionResponse { username: identity.username, token }))
}

/// `DELETE /sessions` — logout.
///
/// Tokens are stateless and cannot be revoked server-side; this validates
/// the caller and returns 204, and the client drops its copy.
pub async fn logout(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
  tracing::debug!(username = %identity.username, "logout");
  StatusCode::NO_CONTENT
}
