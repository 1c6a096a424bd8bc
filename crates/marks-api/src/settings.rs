//! Handler for account settings — public profile fields and password.

use axum::{Json, extract::State};
use marks_auth::password::hash_password;
use marks_core::{
  clock::now_millis,
  owned::Ownership,
  profile::NewProfile,
  store::{CredentialStore, ItemStore},
  view::PublicProfile,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, extract::CurrentUser};

/// Fields accepted by `PUT /settings`. Absent fields keep their stored
/// value; there is no way to clear a field back to empty here.
#[derive(Debug, Deserialize)]
pub struct SettingsBody {
  pub name:         Option<String>,
  pub location:     Option<String>,
  pub website:      Option<String>,
  pub avatar:       Option<String>,
  pub bio:          Option<String>,
  pub new_password: Option<String>,
}

/// `PUT /settings` — update the caller's profile and, optionally, their
/// password. Responds with the profile as publicly visible.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Json(body): Json<SettingsBody>,
) -> Result<Json<PublicProfile>, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  let now = now_millis();

  if let Some(new_password) = &body.new_password {
    if new_password.is_empty() {
      return Err(ApiError::Validation(marks_core::Error::MissingField(
        "new_password",
      )));
    }
    let hash = hash_password(new_password)
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state
      .store
      .set_password_hash(identity.identity_id, hash)
      .await
      .map_err(ApiError::store)?;
    tracing::debug!(username = %identity.username, "password changed");
  }

  let existing = state
    .store
    .find_profile_by_owner(identity.identity_id)
    .await
    .map_err(ApiError::store)?;

  let mut input = match existing {
    Some(p) => NewProfile {
      ownership:  Ownership {
        owner:    identity.identity_id,
        username: identity.username.clone(),
      },
      timestamps: p.timestamps,
      name:       p.name,
      location:   p.location,
      website:    p.website,
      avatar:     p.avatar,
      bio:        p.bio,
    },
    None => {
      NewProfile::empty(identity.identity_id, identity.username.clone(), now)
    }
  };
  input.timestamps.updated_at = now;

  if body.name.is_some() {
    input.name = body.name;
  }
  if body.location.is_some() {
    input.location = body.location;
  }
  if body.website.is_some() {
    input.website = body.website;
  }
  if body.avatar.is_some() {
    input.avatar = body.avatar;
  }
  if body.bio.is_some() {
    input.bio = body.bio;
  }

  let profile = state
    .store
    .save_profile(input)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(PublicProfile::from(&profile)))
}
