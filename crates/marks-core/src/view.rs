//! View assembly — the safe-for-exposure projection of items.
//!
//! Pure transformation, no I/O. Ordering is whatever the upstream query
//! produced; nothing here re-sorts.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::{item::Item, profile::Profile};

/// An item projected for untrusted consumers: the `owner` reference is
/// stripped and the update instant gains a human-friendly rendering.
/// `id` is the item id serialised as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentedItem {
  pub id:             String,
  pub url:            String,
  pub title:          String,
  pub tags:           Vec<String>,
  pub liked:          bool,
  pub archived:       bool,
  pub deleted:        bool,
  pub updated_at:     i64,
  pub formatted_date: String,
}

impl PresentedItem {
  fn project(item: &Item, now_ms: i64) -> Self {
    Self {
      id:             item.item_id.hyphenated().to_string(),
      url:            item.url.clone(),
      title:          item.title.clone(),
      tags:           item.tags.clone(),
      liked:          item.liked,
      archived:       item.archived,
      deleted:        item.deleted,
      updated_at:     item.timestamps.updated_at,
      formatted_date: relative_date(item.timestamps.updated_at, now_ms),
    }
  }
}

/// Owner-facing projection: strips the owner reference, keeps everything
/// else including deleted records (their owner may still undelete them).
pub fn present(items: &[Item], now_ms: i64) -> Vec<PresentedItem> {
  items.iter().map(|i| PresentedItem::project(i, now_ms)).collect()
}

/// Public projection: additionally guarantees no `deleted = true` record
/// is ever included. The owner reference and denormalised username never
/// appear in the output shape at all.
pub fn present_public(items: &[Item], now_ms: i64) -> Vec<PresentedItem> {
  items
    .iter()
    .filter(|i| !i.deleted)
    .map(|i| PresentedItem::project(i, now_ms))
    .collect()
}

/// A profile with the owner reference stripped, safe for public display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
  pub username: String,
  pub name:     Option<String>,
  pub location: Option<String>,
  pub website:  Option<String>,
  pub avatar:   Option<String>,
  pub bio:      Option<String>,
}

impl From<&Profile> for PublicProfile {
  fn from(p: &Profile) -> Self {
    Self {
      username: p.ownership.username.clone(),
      name:     p.name.clone(),
      location: p.location.clone(),
      website:  p.website.clone(),
      avatar:   p.avatar.clone(),
      bio:      p.bio.clone(),
    }
  }
}

// ─── Relative dates ──────────────────────────────────────────────────────────

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Render an update instant relative to `now_ms`.
///
/// Buckets: under a minute "just now", under an hour "N minutes ago",
/// under a day "N hours ago", under thirty days "N days ago", otherwise
/// the absolute date. Instants in the future collapse to "just now".
pub fn relative_date(at_ms: i64, now_ms: i64) -> String {
  let delta = now_ms - at_ms;
  if delta < MINUTE_MS {
    "just now".to_string()
  } else if delta < HOUR_MS {
    format!("{} minutes ago", delta / MINUTE_MS)
  } else if delta < DAY_MS {
    format!("{} hours ago", delta / HOUR_MS)
  } else if delta < 30 * DAY_MS {
    format!("{} days ago", delta / DAY_MS)
  } else {
    DateTime::from_timestamp_millis(at_ms)
      .map(|dt| dt.format("%Y-%m-%d").to_string())
      .unwrap_or_else(|| "long ago".to_string())
  }
}
