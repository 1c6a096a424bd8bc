//! Error types for `marks-auth`.
//!
//! The variants carry the precise failure reason for logging. Callers
//! facing the outside world must collapse all of them into one generic
//! "not authenticated" outcome — which factor failed is never revealed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("bad username")]
  BadUsername,

  #[error("bad password")]
  BadPassword,

  #[error("session token expired")]
  ExpiredToken,

  #[error("session token signature mismatch")]
  BadSignature,

  #[error("missing credentials")]
  MissingCredentials,

  #[error("password hashing error: {0}")]
  Hash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = AuthError> = std::result::Result<T, E>;
