//! [`SqliteStore`] — the SQLite implementation of [`CredentialStore`] and
//! [`ItemStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use marks_core::{
  identity::{Identity, NewIdentity},
  item::{Item, NewItem},
  lifecycle::FlagPatch,
  profile::{NewProfile, Profile},
  store::{CredentialStore, ItemFilter, ItemStore},
};

use crate::{
  Error, Result,
  encode::{RawIdentity, RawItem, RawProfile, encode_tags, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Marks store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Whether a database error is a UNIQUE-constraint violation.
fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

/// Column list shared by every item SELECT.
const ITEM_COLUMNS: &str = "item_id, owner, username, created_at, \
                            updated_at, url, title, tags, liked, archived, \
                            deleted";

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawItem> {
  Ok(RawItem {
    item_id:    row.get(0)?,
    owner:      row.get(1)?,
    username:   row.get(2)?,
    created_at: row.get(3)?,
    updated_at: row.get(4)?,
    url:        row.get(5)?,
    title:      row.get(6)?,
    tags:       row.get(7)?,
    liked:      row.get(8)?,
    archived:   row.get(9)?,
    deleted:    row.get(10)?,
  })
}

fn identity_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIdentity> {
  Ok(RawIdentity {
    identity_id:   row.get(0)?,
    username:      row.get(1)?,
    password_hash: row.get(2)?,
    created_at:    row.get(3)?,
    last_login:    row.get(4)?,
    is_active:     row.get(5)?,
  })
}

fn profile_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    profile_id: row.get(0)?,
    owner:      row.get(1)?,
    username:   row.get(2)?,
    created_at: row.get(3)?,
    updated_at: row.get(4)?,
    name:       row.get(5)?,
    location:   row.get(6)?,
    website:    row.get(7)?,
    avatar:     row.get(8)?,
    bio:        row.get(9)?,
  })
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn add_identity(&self, input: NewIdentity) -> Result<Identity> {
    let identity = Identity {
      identity_id:   Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      created_at:    input.created_at,
      last_login:    input.created_at,
      is_active:     true,
    };

    let id_str   = encode_uuid(identity.identity_id);
    let username = identity.username.clone();
    let hash     = identity.password_hash.clone();
    let created  = identity.created_at;

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO identities
             (identity_id, username, password_hash, created_at, last_login, is_active)
           VALUES (?1, ?2, ?3, ?4, ?4, 1)",
          rusqlite::params![id_str, username, hash, created],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(identity),
      Err(e) if is_unique_violation(&e) => {
        Err(Error::UsernameTaken(identity.username))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn find_identity(&self, username: &str) -> Result<Option<Identity>> {
    let username = username.to_owned();

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT identity_id, username, password_hash, created_at,
                      last_login, is_active
               FROM identities WHERE username = ?1",
              rusqlite::params![username],
              identity_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn touch_last_login(&self, identity_id: Uuid, at_ms: i64) -> Result<()> {
    let id_str = encode_uuid(identity_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE identities SET last_login = ?2 WHERE identity_id = ?1",
          rusqlite::params![id_str, at_ms],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::IdentityNotFound(identity_id));
    }
    Ok(())
  }

  async fn set_password_hash(
    &self,
    identity_id: Uuid,
    password_hash: String,
  ) -> Result<()> {
    let id_str = encode_uuid(identity_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE identities SET password_hash = ?2 WHERE identity_id = ?1",
          rusqlite::params![id_str, password_hash],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::IdentityNotFound(identity_id));
    }
    Ok(())
  }

  async fn save_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile_id = encode_uuid(Uuid::new_v4());
    let owner      = encode_uuid(input.ownership.owner);
    let username   = input.ownership.username.clone();
    let created_at = input.timestamps.created_at;
    let updated_at = input.timestamps.updated_at;
    let name       = input.name.clone();
    let location   = input.location.clone();
    let website    = input.website.clone();
    let avatar     = input.avatar.clone();
    let bio        = input.bio.clone();

    self
      .conn
      .call(move |conn| {
        // Upsert keyed on owner: first save creates the row, later saves
        // replace the mutable fields and keep profile_id/created_at.
        conn.execute(
          "INSERT INTO profiles
             (profile_id, owner, username, created_at, updated_at,
              name, location, website, avatar, bio)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT(owner) DO UPDATE SET
             username   = excluded.username,
             updated_at = excluded.updated_at,
             name       = excluded.name,
             location   = excluded.location,
             website    = excluded.website,
             avatar     = excluded.avatar,
             bio        = excluded.bio",
          rusqlite::params![
            profile_id, owner, username, created_at, updated_at, name,
            location, website, avatar, bio,
          ],
        )?;
        Ok(())
      })
      .await?;

    let stored = self.find_profile_by_owner(input.ownership.owner).await?;
    stored.ok_or(Error::IdentityNotFound(input.ownership.owner))
  }

  async fn find_profile_by_owner(&self, owner: Uuid) -> Result<Option<Profile>> {
    let owner_str = encode_uuid(owner);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT profile_id, owner, username, created_at, updated_at,
                      name, location, website, avatar, bio
               FROM profiles WHERE owner = ?1",
              rusqlite::params![owner_str],
              profile_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn find_profile_by_username(
    &self,
    username: &str,
  ) -> Result<Option<Profile>> {
    let username = username.to_ascii_lowercase();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT profile_id, owner, username, created_at, updated_at,
                      name, location, website, avatar, bio
               FROM profiles WHERE username = ?1",
              rusqlite::params![username],
              profile_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  type Error = Error;

  async fn add_item(&self, input: NewItem) -> Result<Item> {
    let item = Item {
      item_id:    Uuid::new_v4(),
      ownership:  input.ownership,
      timestamps: input.timestamps,
      url:        input.url,
      title:      input.title,
      tags:       input.tags,
      liked:      false,
      archived:   false,
      deleted:    false,
    };

    let id_str    = encode_uuid(item.item_id);
    let owner_str = encode_uuid(item.ownership.owner);
    let username  = item.ownership.username.clone();
    let created   = item.timestamps.created_at;
    let updated   = item.timestamps.updated_at;
    let url       = item.url.clone();
    let title     = item.title.clone();
    let tags_str  = encode_tags(&item.tags)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO items
             (item_id, owner, username, created_at, updated_at,
              url, title, tags, liked, archived, deleted)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0, 0)",
          rusqlite::params![
            id_str, owner_str, username, created, updated, url, title,
            tags_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn get_item(&self, item_id: Uuid) -> Result<Option<Item>> {
    let id_str = encode_uuid(item_id);

    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ITEM_COLUMNS} FROM items WHERE item_id = ?1"),
              rusqlite::params![id_str],
              item_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn items_by_owner(
    &self,
    owner: Uuid,
    filter: &ItemFilter,
  ) -> Result<Vec<Item>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS} FROM items
           WHERE owner = ?1
           ORDER BY updated_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], item_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut items: Vec<Item> = raws
      .into_iter()
      .map(RawItem::into_item)
      .collect::<Result<_>>()?;
    items.retain(|i| filter.matches(i));
    Ok(items)
  }

  async fn items_by_username(
    &self,
    username: &str,
    filter: &ItemFilter,
  ) -> Result<Vec<Item>> {
    let username = username.to_ascii_lowercase();

    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS} FROM items
           WHERE username = ?1
           ORDER BY updated_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![username], item_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut items: Vec<Item> = raws
      .into_iter()
      .map(RawItem::into_item)
      .collect::<Result<_>>()?;
    items.retain(|i| filter.matches(i));
    Ok(items)
  }

  async fn update_flags(
    &self,
    owner: Uuid,
    item_id: Uuid,
    patch: &FlagPatch,
  ) -> Result<bool> {
    let id_str    = encode_uuid(item_id);
    let owner_str = encode_uuid(owner);
    let archived  = patch.archived;
    let liked     = patch.liked;
    let deleted   = patch.deleted;

    // Ownership check and mutation are one conditional statement: a write
    // against someone else's item matches zero rows and changes nothing.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE items SET
             archived = COALESCE(?3, archived),
             liked    = COALESCE(?4, liked),
             deleted  = COALESCE(?5, deleted)
           WHERE item_id = ?1 AND owner = ?2",
          rusqlite::params![id_str, owner_str, archived, liked, deleted],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
