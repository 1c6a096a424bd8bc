//! Signed session tokens.
//!
//! A token is `base64url(username:expiry_ms) . hex(hmac_sha256(payload))`,
//! keyed by a server-held secret. Tamper-evident and self-expiring; the
//! server keeps no session state. Verification rejects on signature
//! mismatch before it ever looks at the expiry.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Default validity window: five years.
pub const DEFAULT_TTL_MS: i64 = 1_826 * 24 * 60 * 60 * 1000;

/// Mints and verifies signed session tokens with an injected secret.
#[derive(Clone)]
pub struct SessionSigner {
  secret: Vec<u8>,
  ttl_ms: i64,
}

impl SessionSigner {
  pub fn new(secret: impl Into<Vec<u8>>) -> Self {
    Self::with_ttl(secret, DEFAULT_TTL_MS)
  }

  pub fn with_ttl(secret: impl Into<Vec<u8>>, ttl_ms: i64) -> Self {
    Self { secret: secret.into(), ttl_ms }
  }

  fn tag(&self, payload: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(&self.secret)
      .expect("HMAC accepts keys of any size");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
  }

  /// Mint a token for `username`, valid for the configured window from
  /// `now_ms`.
  pub fn mint(&self, username: &str, now_ms: i64) -> String {
    let payload = format!("{username}:{}", now_ms + self.ttl_ms);
    let tag = self.tag(&payload);
    format!("{}.{}", B64.encode(payload), hex::encode(tag))
  }

  /// Verify a token at instant `now_ms` and return the username it
  /// carries.
  pub fn verify_at(&self, token: &str, now_ms: i64) -> Result<String> {
    let (payload_b64, tag_hex) =
      token.split_once('.').ok_or(AuthError::BadSignature)?;

    let payload_bytes =
      B64.decode(payload_b64).map_err(|_| AuthError::BadSignature)?;
    let payload = std::str::from_utf8(&payload_bytes)
      .map_err(|_| AuthError::BadSignature)?;

    let tag = hex::decode(tag_hex).map_err(|_| AuthError::BadSignature)?;
    let mut mac = HmacSha256::new_from_slice(&self.secret)
      .expect("HMAC accepts keys of any size");
    mac.update(payload.as_bytes());
    // Constant-time comparison.
    mac.verify_slice(&tag).map_err(|_| AuthError::BadSignature)?;

    let (username, expiry_str) =
      payload.rsplit_once(':').ok_or(AuthError::BadSignature)?;
    let expiry_ms: i64 =
      expiry_str.parse().map_err(|_| AuthError::BadSignature)?;

    if now_ms >= expiry_ms {
      return Err(AuthError::ExpiredToken);
    }

    Ok(username.to_string())
  }
}
