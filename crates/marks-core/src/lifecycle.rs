//! Soft-state transitions over items.
//!
//! A transition sets exactly one boolean flag. Transitions are idempotent:
//! archiving an already-archived item is a successful no-op. Ownership is
//! enforced by the store's conditional update, never by a separate read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::ItemStore;

/// A named, idempotent state-flag mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
  Archive,
  Unarchive,
  Like,
  Unlike,
  Delete,
  Undelete,
}

/// Partial update over the flag allow-list. Exactly the fields a store is
/// permitted to change after creation; `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagPatch {
  pub archived: Option<bool>,
  pub liked:    Option<bool>,
  pub deleted:  Option<bool>,
}

/// Transition instructions as a caller may supply them, possibly several
/// at once.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TransitionArgs {
  #[serde(default)]
  pub archive:   bool,
  #[serde(default)]
  pub unarchive: bool,
  #[serde(default)]
  pub like:      bool,
  #[serde(default)]
  pub unlike:    bool,
  #[serde(default)]
  pub delete:    bool,
  #[serde(default)]
  pub undelete:  bool,
}

impl Transition {
  /// The single-flag patch this transition stands for.
  pub fn patch(self) -> FlagPatch {
    match self {
      Self::Archive => FlagPatch { archived: Some(true), ..FlagPatch::default() },
      Self::Unarchive => FlagPatch { archived: Some(false), ..FlagPatch::default() },
      Self::Like => FlagPatch { liked: Some(true), ..FlagPatch::default() },
      Self::Unlike => FlagPatch { liked: Some(false), ..FlagPatch::default() },
      Self::Delete => FlagPatch { deleted: Some(true), ..FlagPatch::default() },
      Self::Undelete => FlagPatch { deleted: Some(false), ..FlagPatch::default() },
    }
  }

  /// Resolve simultaneous instructions to at most one transition.
  ///
  /// Precedence is fixed: archive > unarchive > like > unlike > delete >
  /// undelete — the first present argument wins and the rest are ignored.
  /// Callers sending conflicting instructions get this rule, documented
  /// and tested, rather than an error.
  pub fn first_of(args: &TransitionArgs) -> Option<Self> {
    if args.archive {
      Some(Self::Archive)
    } else if args.unarchive {
      Some(Self::Unarchive)
    } else if args.like {
      Some(Self::Like)
    } else if args.unlike {
      Some(Self::Unlike)
    } else if args.delete {
      Some(Self::Delete)
    } else if args.undelete {
      Some(Self::Undelete)
    } else {
      None
    }
  }
}

/// Apply one transition to an owned item.
///
/// Returns `Ok(true)` when a row owned by `owner` matched (including the
/// idempotent already-in-that-state case) and `Ok(false)` when no such row
/// exists — wrong id or wrong owner, indistinguishable by design.
pub async fn apply_transition<S>(
  store: &S,
  owner: Uuid,
  item_id: Uuid,
  transition: Transition,
) -> Result<bool, S::Error>
where
  S: ItemStore,
{
  store.update_flags(owner, item_id, &transition.patch()).await
}
