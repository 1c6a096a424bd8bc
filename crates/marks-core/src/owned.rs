//! Shared value objects embedded by every owned entity.
//!
//! The source of truth for "who owns this record" and "when was it touched"
//! lives here as plain embedded structs rather than inheritance. Entities
//! expose them uniformly through [`HasOwner`] and [`HasTimestamps`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exclusive ownership of a record by one identity.
///
/// `username` is the denormalised owner username, kept on the record for
/// query convenience (public listings resolve by username without touching
/// the identity table). It is always stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
  pub owner:    Uuid,
  pub username: String,
}

/// Creation and last-update instants, in milliseconds since the Unix epoch.
/// No timezone conversion happens below the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
  pub created_at: i64,
  pub updated_at: i64,
}

impl Timestamps {
  /// Both stamps set to the same instant — the shape of a fresh record.
  pub fn at(now_ms: i64) -> Self {
    Self { created_at: now_ms, updated_at: now_ms }
  }
}

/// Capability interface over [`Ownership`].
pub trait HasOwner {
  fn owner(&self) -> Uuid;
  fn owner_username(&self) -> &str;
}

/// Capability interface over [`Timestamps`].
pub trait HasTimestamps {
  fn created_at(&self) -> i64;
  fn updated_at(&self) -> i64;
}
