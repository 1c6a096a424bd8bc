//! Error types for `marks-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("malformed url: {0:?}")]
  MalformedUrl(String),

  #[error("username too long: {0:?}")]
  UsernameTooLong(String),

  #[error("username contains invalid characters: {0:?}")]
  BadUsernameCharacters(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
