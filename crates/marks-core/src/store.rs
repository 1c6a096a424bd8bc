//! The `CredentialStore` and `ItemStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `marks-store-sqlite`). Higher layers (`marks-auth`, `marks-api`) depend
//! on these abstractions, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  identity::{Identity, NewIdentity},
  item::{Item, NewItem},
  lifecycle::FlagPatch,
  profile::{NewProfile, Profile},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Structured predicate for item listings.
///
/// Unset flag filters mean "any"; `tags` matches items carrying at least
/// one of the given tags (logical OR). An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
  pub tags:     Vec<String>,
  pub archived: Option<bool>,
  pub liked:    Option<bool>,
}

impl ItemFilter {
  /// Whether `item` satisfies this predicate.
  pub fn matches(&self, item: &Item) -> bool {
    if let Some(archived) = self.archived
      && item.archived != archived
    {
      return false;
    }
    if let Some(liked) = self.liked
      && item.liked != liked
    {
      return false;
    }
    if !self.tags.is_empty()
      && !self.tags.iter().any(|t| item.tags.contains(t))
    {
      return false;
    }
    true
  }
}

// ─── Credential store ────────────────────────────────────────────────────────

/// Persistence over identities and their public profiles.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new identity. Fails when the username is already taken
  /// (usernames are globally unique).
  fn add_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Look up an identity by case-normalised username.
  fn find_identity<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Record a successful login. The only identity mutation besides a
  /// password change.
  fn touch_last_login(
    &self,
    identity_id: Uuid,
    at_ms: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace an identity's password hash.
  fn set_password_hash(
    &self,
    identity_id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Upsert the profile for `input.ownership.owner` (one profile per
  /// identity).
  fn save_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Fetch a profile by its owning identity.
  fn find_profile_by_owner(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Fetch a profile by (case-normalised) username.
  fn find_profile_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;
}

// ─── Item store ──────────────────────────────────────────────────────────────

/// Persistence over the item collection.
///
/// Secondary indexes on `owner` and `username` are part of the schema and
/// created idempotently when the store opens.
pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new item and return it with its store-assigned id.
  fn add_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<Item, Self::Error>> + Send + '_;

  /// Retrieve an item by id. Returns `None` if not found.
  fn get_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// All of `owner`'s items satisfying `filter`, ordered by `updated_at`
  /// descending. Deleted items are returned like any other — visibility
  /// policy belongs to the caller.
  fn items_by_owner<'a>(
    &'a self,
    owner: Uuid,
    filter: &'a ItemFilter,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + 'a;

  /// Same as [`Self::items_by_owner`], keyed by the denormalised owner
  /// username. Used by public profile listings.
  fn items_by_username<'a>(
    &'a self,
    username: &'a str,
    filter: &'a ItemFilter,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + 'a;

  /// Partial update restricted to the `{archived, liked, deleted}`
  /// allow-list.
  ///
  /// The owner constraint is part of the conditional update itself
  /// (`WHERE item_id = ? AND owner = ?`), so an attempt against an item
  /// the caller does not own fails without writing — there is no
  /// check-then-act window. Returns whether a row matched.
  fn update_flags<'a>(
    &'a self,
    owner: Uuid,
    item_id: Uuid,
    patch: &'a FlagPatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::owned::{Ownership, Timestamps};

  fn item(tags: &[&str], archived: bool, liked: bool) -> Item {
    Item {
      item_id:    Uuid::new_v4(),
      ownership:  Ownership {
        owner:    Uuid::new_v4(),
        username: "alice".into(),
      },
      timestamps: Timestamps::at(0),
      url:        "http://example.com".into(),
      title:      "Example".into(),
      tags:       tags.iter().map(|t| t.to_string()).collect(),
      liked,
      archived,
      deleted:    false,
    }
  }

  #[test]
  fn empty_filter_matches_everything() {
    let f = ItemFilter::default();
    assert!(f.matches(&item(&[], false, false)));
    assert!(f.matches(&item(&["news"], true, true)));
  }

  #[test]
  fn tri_state_flags_filter_when_set() {
    let f = ItemFilter { archived: Some(true), ..ItemFilter::default() };
    assert!(f.matches(&item(&[], true, false)));
    assert!(!f.matches(&item(&[], false, false)));

    let f = ItemFilter { liked: Some(false), ..ItemFilter::default() };
    assert!(f.matches(&item(&[], true, false)));
    assert!(!f.matches(&item(&[], false, true)));
  }

  #[test]
  fn tags_match_is_a_logical_or() {
    let f = ItemFilter {
      tags: vec!["news".into(), "tech".into()],
      ..ItemFilter::default()
    };
    assert!(f.matches(&item(&["tech"], false, false)));
    assert!(f.matches(&item(&["news", "misc"], false, false)));
    assert!(!f.matches(&item(&["misc"], false, false)));
    assert!(!f.matches(&item(&[], false, false)));
  }
}
