//! Identity — a registered user account.
//!
//! Holds the credentials and login metadata only. Anything publicly
//! viewable about a user lives in [`crate::profile::Profile`], stored
//! separately so the password hash never travels with public reads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum accepted username length.
pub const MAX_USERNAME_LEN: usize = 30;

/// A registered user account.
///
/// Usernames are case-normalised (lowercase) and globally unique. An
/// identity is never hard-deleted; deactivation flips `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub identity_id:   Uuid,
  pub username:      String,
  /// Argon2 PHC string. Never serialised outward.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub created_at:    i64,
  pub last_login:    i64,
  pub is_active:     bool,
}

/// Input to [`crate::store::CredentialStore::add_identity`].
/// The store assigns the id; `created_at`/`last_login` are stamped from
/// `now_ms` at registration.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub username:      String,
  pub password_hash: String,
  pub created_at:    i64,
}

impl NewIdentity {
  /// Validate and case-normalise a username, pairing it with an
  /// already-derived password hash.
  pub fn build(
    username: &str,
    password_hash: String,
    now_ms: i64,
  ) -> Result<Self> {
    let username = normalize_username(username)?;
    Ok(Self { username, password_hash, created_at: now_ms })
  }
}

/// Lowercase a username, rejecting empty, over-long, or non-word input.
pub fn normalize_username(username: &str) -> Result<String> {
  let username = username.trim();
  if username.is_empty() {
    return Err(Error::MissingField("username"));
  }
  if username.len() > MAX_USERNAME_LEN {
    return Err(Error::UsernameTooLong(username.to_string()));
  }
  if !username
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || c == '_')
  {
    return Err(Error::BadUsernameCharacters(username.to_string()));
  }
  Ok(username.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_to_lowercase() {
    assert_eq!(normalize_username("Alice").unwrap(), "alice");
    assert_eq!(normalize_username("BOB_99").unwrap(), "bob_99");
  }

  #[test]
  fn rejects_empty() {
    assert!(matches!(
      normalize_username("   "),
      Err(Error::MissingField("username"))
    ));
  }

  #[test]
  fn rejects_over_thirty_chars() {
    let long = "a".repeat(31);
    assert!(matches!(
      normalize_username(&long),
      Err(Error::UsernameTooLong(_))
    ));
  }

  #[test]
  fn rejects_non_word_characters() {
    assert!(matches!(
      normalize_username("al ice"),
      Err(Error::BadUsernameCharacters(_))
    ));
    assert!(matches!(
      normalize_username("alice:x"),
      Err(Error::BadUsernameCharacters(_))
    ));
  }
}
