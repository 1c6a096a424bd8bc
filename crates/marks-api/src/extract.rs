//! Session-token extractor.
//!
//! Accepts the token from either channel the orchestration layer offers:
//! an `Authorization: Bearer …` header or a `session` cookie. Credential
//! (username/password) authentication happens only in the login handler,
//! which owns the request body.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use marks_auth::Credentials;
use marks_core::{
  clock::now_millis,
  identity::Identity,
  store::{CredentialStore, ItemStore},
};

use crate::{AppState, error::ApiError};

/// Present in a handler's arguments means the request carried a valid
/// session token for this identity.
pub struct CurrentUser(pub Identity);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::to_string)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
  let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == "session").then(|| value.to_string())
  })
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: CredentialStore + ItemStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .or_else(|| session_cookie(&parts.headers))
      .ok_or(ApiError::Unauthorized)?;

    let identity = state
      .auth
      .authenticate(
        state.store.as_ref(),
        &Credentials::from_token(token),
        now_millis(),
      )
      .await
      .map_err(|_| ApiError::Unauthorized)?;

    Ok(CurrentUser(identity))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (k, v) in pairs {
      map.insert(k.clone(), v.parse().unwrap());
    }
    map
  }

  #[test]
  fn bearer_header_wins() {
    let h = headers(&[(header::AUTHORIZATION, "Bearer tok-123")]);
    assert_eq!(bearer_token(&h).as_deref(), Some("tok-123"));
  }

  #[test]
  fn non_bearer_authorization_is_ignored() {
    let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
    assert!(bearer_token(&h).is_none());
  }

  #[test]
  fn session_cookie_is_found_among_others() {
    let h = headers(&[(header::COOKIE, "theme=dark; session=tok-456; x=1")]);
    assert_eq!(session_cookie(&h).as_deref(), Some("tok-456"));
  }

  #[test]
  fn missing_cookie_yields_none() {
    let h = headers(&[(header::COOKIE, "theme=dark")]);
    assert!(session_cookie(&h).is_none());
  }
}
