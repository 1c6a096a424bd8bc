//! Handlers for `/items` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/items` | Owner-scoped; optional `tags`, `archived`, `liked` |
//! | `POST` | `/items` | Body: `{"url","title","tags"}`; returns 201 |
//! | `POST` | `/items/{id}` | Body: transition booleans; one wins |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use marks_core::{
  clock::now_millis,
  item::{NewItem, split_tags},
  lifecycle::{Transition, TransitionArgs, apply_transition},
  store::{CredentialStore, ItemFilter, ItemStore},
  view::{PresentedItem, present},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::CurrentUser};

// ─── List ─────────────────────────────────────────────────────────────────────

/// Query parameters accepted by the listing endpoints. `tags` is a
/// comma-separated string; the flag filters are tri-state (absent means
/// any).
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub tags:     Option<String>,
  pub archived: Option<bool>,
  pub liked:    Option<bool>,
}

impl ListParams {
  pub fn into_filter(self) -> ItemFilter {
    ItemFilter {
      tags:     split_tags(self.tags.as_deref().unwrap_or_default()),
      archived: self.archived,
      liked:    self.liked,
    }
  }
}

/// The JSON list shape: `{"num_items": N, "items": [...]}`.
#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub num_items: usize,
  pub items:     Vec<PresentedItem>,
}

impl ListResponse {
  pub fn of(items: Vec<PresentedItem>) -> Self {
    Self { num_items: items.len(), items }
  }
}

/// `GET /items[?tags=a,b][&archived=true|false][&liked=true|false]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  let filter = params.into_filter();
  let items = state
    .store
    .items_by_owner(identity.identity_id, &filter)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(ListResponse::of(present(&items, now_millis()))))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewItemBody {
  pub url:   String,
  pub title: String,
  /// Comma-delimited; absent and `""` both mean no tags.
  #[serde(default)]
  pub tags:  String,
}

/// `POST /items` — submit a link; returns 201 + the presented item.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Json(body): Json<NewItemBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  let now = now_millis();
  let input = NewItem::build(
    identity.identity_id,
    identity.username.clone(),
    &body.url,
    &body.title,
    &body.tags,
    now,
  )?;

  let item = state.store.add_item(input).await.map_err(ApiError::store)?;

  tracing::debug!(username = %identity.username, url = %item.url, "item added");

  let mut presented = present(std::slice::from_ref(&item), now);
  Ok((StatusCode::CREATED, Json(presented.remove(0))))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /items/{id}` — apply one soft-state transition.
///
/// The body carries any of the six transition booleans; when several are
/// set the fixed precedence (archive > unarchive > like > unlike > delete
/// > undelete) picks one. Responds with the item as stored after the
/// write. A miss — unknown id or an item the caller does not own — is a
/// single indistinguishable 404.
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Path(id): Path<Uuid>,
  Json(args): Json<TransitionArgs>,
) -> Result<Json<PresentedItem>, ApiError>
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  let transition = Transition::first_of(&args)
    .ok_or_else(|| ApiError::BadRequest("no transition requested".into()))?;

  let matched =
    apply_transition(state.store.as_ref(), identity.identity_id, id, transition)
      .await
      .map_err(ApiError::store)?;

  if !matched {
    return Err(ApiError::NotFound(format!("item {id} not found")));
  }

  // The write completed above; this read observes the post-update state.
  let item = state
    .store
    .get_item(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("item {id} not found")))?;

  let mut presented = present(std::slice::from_ref(&item), now_millis());
  Ok(Json(presented.remove(0)))
}
