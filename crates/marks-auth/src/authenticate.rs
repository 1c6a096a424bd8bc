//! Identity resolution from a signed token or a credential pair.

use marks_core::{identity::Identity, store::CredentialStore};

use crate::{
  AuthError, Result, password::verify_password, session::SessionSigner,
};

/// What a request may carry to prove who it is. A verifiable signed token
/// short-circuits; the credential fields are then ignored.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
  pub token:    Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
}

impl Credentials {
  pub fn from_token(token: impl Into<String>) -> Self {
    Self { token: Some(token.into()), ..Self::default() }
  }

  pub fn from_pair(
    username: impl Into<String>,
    password: impl Into<String>,
  ) -> Self {
    Self {
      token:    None,
      username: Some(username.into()),
      password: Some(password.into()),
    }
  }
}

/// Resolves request credentials to an [`Identity`].
///
/// Failure reasons are logged here with their tag; the caller surfaces
/// only a generic unauthenticated outcome.
#[derive(Clone)]
pub struct Authenticator {
  signer: SessionSigner,
}

impl Authenticator {
  pub fn new(signer: SessionSigner) -> Self { Self { signer } }

  /// The signer, for callers that mint tokens after a credential login.
  pub fn signer(&self) -> &SessionSigner { &self.signer }

  pub async fn authenticate<C>(
    &self,
    store: &C,
    credentials: &Credentials,
    now_ms: i64,
  ) -> Result<Identity>
  where
    C: CredentialStore,
  {
    if let Some(token) = &credentials.token {
      return self.authenticate_token(store, token, now_ms).await;
    }

    let (Some(username), Some(password)) =
      (&credentials.username, &credentials.password)
    else {
      tracing::warn!(reason = "missing_credentials", "auth failure");
      return Err(AuthError::MissingCredentials);
    };

    self.authenticate_pair(store, username, password).await
  }

  async fn authenticate_token<C>(
    &self,
    store: &C,
    token: &str,
    now_ms: i64,
  ) -> Result<Identity>
  where
    C: CredentialStore,
  {
    let username = self.signer.verify_at(token, now_ms).inspect_err(|e| {
      tracing::warn!(reason = %e, "auth failure: bad session token");
    })?;

    let identity = self
      .load_active(store, &username)
      .await?
      .ok_or_else(|| {
        tracing::warn!(reason = "bad_username", %username, "auth failure");
        AuthError::BadUsername
      })?;

    Ok(identity)
  }

  async fn authenticate_pair<C>(
    &self,
    store: &C,
    username: &str,
    password: &str,
  ) -> Result<Identity>
  where
    C: CredentialStore,
  {
    let identity = self
      .load_active(store, &username.to_ascii_lowercase())
      .await?
      .ok_or_else(|| {
        tracing::warn!(reason = "bad_username", %username, "auth failure");
        AuthError::BadUsername
      })?;

    // The stored username must match the query case-sensitively; a lookup
    // that only succeeded through case normalisation does not count.
    if identity.username != username {
      tracing::warn!(reason = "bad_username", %username, "auth failure");
      return Err(AuthError::BadUsername);
    }

    if !verify_password(password, &identity.password_hash) {
      tracing::warn!(reason = "bad_password", %username, "auth failure");
      return Err(AuthError::BadPassword);
    }

    tracing::debug!(%username, "access granted");
    Ok(identity)
  }

  /// Load by username, treating deactivated accounts as absent.
  async fn load_active<C>(
    &self,
    store: &C,
    username: &str,
  ) -> Result<Option<Identity>>
  where
    C: CredentialStore,
  {
    let identity = store
      .find_identity(username)
      .await
      .map_err(|e| AuthError::Store(Box::new(e)))?;
    Ok(identity.filter(|i| i.is_active))
  }
}
