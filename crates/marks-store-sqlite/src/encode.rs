//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as integer epoch millis, flags as 0/1 integers,
//! tags as compact JSON arrays. UUIDs are stored as hyphenated lowercase
//! strings.

use marks_core::{
  identity::Identity,
  item::Item,
  owned::{Ownership, Timestamps},
  profile::Profile,
};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id:   String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    i64,
  pub last_login:    i64,
  pub is_active:     bool,
}

impl RawIdentity {
  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      identity_id:   decode_uuid(&self.identity_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    self.created_at,
      last_login:    self.last_login,
      is_active:     self.is_active,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id: String,
  pub owner:      String,
  pub username:   String,
  pub created_at: i64,
  pub updated_at: i64,
  pub name:       Option<String>,
  pub location:   Option<String>,
  pub website:    Option<String>,
  pub avatar:     Option<String>,
  pub bio:        Option<String>,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id: decode_uuid(&self.profile_id)?,
      ownership:  Ownership {
        owner:    decode_uuid(&self.owner)?,
        username: self.username,
      },
      timestamps: Timestamps {
        created_at: self.created_at,
        updated_at: self.updated_at,
      },
      name:       self.name,
      location:   self.location,
      website:    self.website,
      avatar:     self.avatar,
      bio:        self.bio,
    })
  }
}

/// Raw values read directly from an `items` row.
pub struct RawItem {
  pub item_id:    String,
  pub owner:      String,
  pub username:   String,
  pub created_at: i64,
  pub updated_at: i64,
  pub url:        String,
  pub title:      String,
  pub tags:       String,
  pub liked:      bool,
  pub archived:   bool,
  pub deleted:    bool,
}

impl RawItem {
  pub fn into_item(self) -> Result<Item> {
    Ok(Item {
      item_id:    decode_uuid(&self.item_id)?,
      ownership:  Ownership {
        owner:    decode_uuid(&self.owner)?,
        username: self.username,
      },
      timestamps: Timestamps {
        created_at: self.created_at,
        updated_at: self.updated_at,
      },
      url:        self.url,
      title:      self.title,
      tags:       decode_tags(&self.tags)?,
      liked:      self.liked,
      archived:   self.archived,
      deleted:    self.deleted,
    })
  }
}
