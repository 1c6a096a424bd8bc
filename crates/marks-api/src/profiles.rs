//! Handler for public profile pages.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use marks_core::{
  clock::now_millis,
  store::{CredentialStore, ItemStore},
  view::{PresentedItem, PublicProfile, present_public},
};
use serde::Serialize;

use crate::{AppState, error::ApiError, items::ListParams};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
  pub profile:   Option<PublicProfile>,
  pub num_items: usize,
  pub items:     Vec<PresentedItem>,
}

/// `GET /u/{username}` — public, no auth.
///
/// Unknown usernames yield an empty listing rather than an error, so the
/// endpoint reveals nothing about which accounts exist. Deleted items
/// never appear here.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<ProfileResponse>, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  let username = username.to_ascii_lowercase();

  let profile = state
    .store
    .find_profile_by_username(&username)
    .await
    .map_err(ApiError::store)?;

  let filter = params.into_filter();
  let items = state
    .store
    .items_by_username(&username, &filter)
    .await
    .map_err(ApiError::store)?;

  let items = present_public(&items, now_millis());
  Ok(Json(ProfileResponse {
    profile:   profile.as_ref().map(PublicProfile::from),
    num_items: items.len(),
    items,
  }))
}
