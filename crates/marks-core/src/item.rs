//! Item — a bookmarked link with soft-state flags and tags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  owned::{HasOwner, HasTimestamps, Ownership, Timestamps},
};

/// A bookmarked link.
///
/// The three soft-state flags are independent: an item can be liked and
/// archived at once. Flipping any of them never removes the row —
/// "deletion" is `deleted = true`, kept on disk so it can be undone.
/// `ownership.owner` is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  pub item_id:    Uuid,
  #[serde(flatten)]
  pub ownership:  Ownership,
  #[serde(flatten)]
  pub timestamps: Timestamps,
  /// Always carries an `http`-family scheme; see [`normalize_url`].
  pub url:        String,
  pub title:      String,
  pub tags:       Vec<String>,
  pub liked:      bool,
  pub archived:   bool,
  pub deleted:    bool,
}

impl HasOwner for Item {
  fn owner(&self) -> Uuid { self.ownership.owner }
  fn owner_username(&self) -> &str { &self.ownership.username }
}

impl HasTimestamps for Item {
  fn created_at(&self) -> i64 { self.timestamps.created_at }
  fn updated_at(&self) -> i64 { self.timestamps.updated_at }
}

/// Input to [`crate::store::ItemStore::add_item`].
/// The store assigns the id; everything else is validated here.
#[derive(Debug, Clone)]
pub struct NewItem {
  pub ownership:  Ownership,
  pub timestamps: Timestamps,
  pub url:        String,
  pub title:      String,
  pub tags:       Vec<String>,
}

impl NewItem {
  /// Validate and normalise a submission.
  ///
  /// - `url` and `title` must be non-empty.
  /// - The URL gets `http://` prepended when no recognised scheme is
  ///   present; URLs containing whitespace are rejected outright.
  /// - `tags` is a comma-delimited string; the empty string yields an
  ///   empty tag set, not a single empty tag.
  /// - Both timestamps are stamped with `now_ms`.
  pub fn build(
    owner: Uuid,
    username: String,
    url: &str,
    title: &str,
    tags: &str,
    now_ms: i64,
  ) -> Result<Self> {
    let title = title.trim();
    if title.is_empty() {
      return Err(Error::MissingField("title"));
    }

    let url = normalize_url(url)?;
    let tags = split_tags(tags);

    Ok(Self {
      ownership: Ownership { owner, username },
      timestamps: Timestamps::at(now_ms),
      url,
      title: title.to_string(),
      tags,
    })
  }
}

/// Ensure a URL carries an `http`-family scheme, prepending `http://` when
/// none is present. An `https://` URL passes through unchanged.
pub fn normalize_url(url: &str) -> Result<String> {
  let url = url.trim();
  if url.is_empty() {
    return Err(Error::MissingField("url"));
  }
  if url.chars().any(char::is_whitespace) {
    return Err(Error::MalformedUrl(url.to_string()));
  }
  if url.starts_with("http://") || url.starts_with("https://") {
    Ok(url.to_string())
  } else {
    Ok(format!("http://{url}"))
  }
}

/// Split a comma-delimited tag string into a tag list, dropping empty
/// segments. `""` yields an empty list.
pub fn split_tags(tags: &str) -> Vec<String> {
  tags
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_without_scheme_gets_http_prefix() {
    assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
  }

  #[test]
  fn http_and_https_urls_pass_through() {
    assert_eq!(
      normalize_url("http://example.com").unwrap(),
      "http://example.com"
    );
    assert_eq!(
      normalize_url("https://example.com").unwrap(),
      "https://example.com"
    );
  }

  #[test]
  fn empty_url_is_missing_field() {
    assert!(matches!(normalize_url(""), Err(Error::MissingField("url"))));
  }

  #[test]
  fn url_with_spaces_is_malformed() {
    assert!(matches!(
      normalize_url("exam ple.com"),
      Err(Error::MalformedUrl(_))
    ));
  }

  #[test]
  fn tags_split_on_commas() {
    assert_eq!(split_tags("a,b,c"), vec!["a", "b", "c"]);
  }

  #[test]
  fn empty_tag_string_yields_empty_set() {
    assert!(split_tags("").is_empty());
  }

  #[test]
  fn blank_tag_segments_are_dropped() {
    assert_eq!(split_tags("news, ,tech,"), vec!["news", "tech"]);
  }

  #[test]
  fn build_rejects_empty_title() {
    let err = NewItem::build(
      Uuid::new_v4(),
      "alice".into(),
      "example.com",
      "  ",
      "",
      0,
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingField("title")));
  }

  #[test]
  fn build_stamps_both_timestamps() {
    let item = NewItem::build(
      Uuid::new_v4(),
      "alice".into(),
      "foo.com",
      "Foo",
      "news,tech",
      1_700_000_000_000,
    )
    .unwrap();
    assert_eq!(item.timestamps.created_at, 1_700_000_000_000);
    assert_eq!(item.timestamps.updated_at, 1_700_000_000_000);
    assert_eq!(item.url, "http://foo.com");
    assert_eq!(item.tags, vec!["news", "tech"]);
  }
}
