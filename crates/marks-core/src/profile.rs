//! Profile — publicly viewable supplementary data about an identity.
//!
//! Stored in its own record so public reads never touch the credential
//! row. Exactly one profile per identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::owned::{HasOwner, HasTimestamps, Ownership, Timestamps};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id: Uuid,
  #[serde(flatten)]
  pub ownership:  Ownership,
  #[serde(flatten)]
  pub timestamps: Timestamps,
  pub name:       Option<String>,
  pub location:   Option<String>,
  pub website:    Option<String>,
  pub avatar:     Option<String>,
  pub bio:        Option<String>,
}

impl HasOwner for Profile {
  fn owner(&self) -> Uuid { self.ownership.owner }
  fn owner_username(&self) -> &str { &self.ownership.username }
}

impl HasTimestamps for Profile {
  fn created_at(&self) -> i64 { self.timestamps.created_at }
  fn updated_at(&self) -> i64 { self.timestamps.updated_at }
}

/// Input to [`crate::store::CredentialStore::save_profile`] — everything
/// but the id, which the store assigns on first save (saving again for the
/// same owner overwrites the mutable fields).
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub ownership:  Ownership,
  pub timestamps: Timestamps,
  pub name:       Option<String>,
  pub location:   Option<String>,
  pub website:    Option<String>,
  pub avatar:     Option<String>,
  pub bio:        Option<String>,
}

impl NewProfile {
  /// An empty profile shell for a freshly registered identity.
  pub fn empty(owner: Uuid, username: String, now_ms: i64) -> Self {
    Self {
      ownership:  Ownership { owner, username },
      timestamps: Timestamps::at(now_ms),
      name:       None,
      location:   None,
      website:    None,
      avatar:     None,
      bio:        None,
    }
  }
}
