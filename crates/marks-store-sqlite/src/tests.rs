//! Integration tests for `SqliteStore` against an in-memory database.

use marks_core::{
  identity::NewIdentity,
  item::NewItem,
  lifecycle::{FlagPatch, Transition, apply_transition},
  profile::NewProfile,
  store::{CredentialStore, ItemFilter, ItemStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

const NOW: i64 = 1_700_000_000_000;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn register(store: &SqliteStore, username: &str) -> marks_core::identity::Identity {
  let input = NewIdentity::build(username, format!("$argon2id$fake-{username}"), NOW)
    .expect("valid username");
  store.add_identity(input).await.expect("register")
}

fn new_item(owner: &marks_core::identity::Identity, url: &str, tags: &str, at: i64) -> NewItem {
  NewItem::build(
    owner.identity_id,
    owner.username.clone(),
    url,
    "A title",
    tags,
    at,
  )
  .expect("valid item")
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_identity() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  assert!(alice.is_active);
  assert_eq!(alice.last_login, NOW);

  let found = s.find_identity("alice").await.unwrap().unwrap();
  assert_eq!(found.identity_id, alice.identity_id);
  assert_eq!(found.password_hash, alice.password_hash);
}

#[tokio::test]
async fn find_identity_missing_returns_none() {
  let s = store().await;
  assert!(s.find_identity("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  register(&s, "alice").await;

  let dup = NewIdentity::build("alice", "another-hash".into(), NOW).unwrap();
  let err = s.add_identity(dup).await.unwrap_err();
  assert!(matches!(err, Error::UsernameTaken(u) if u == "alice"));
}

#[tokio::test]
async fn mixed_case_registration_lands_lowercase() {
  let s = store().await;
  let id = register(&s, "Alice").await;
  assert_eq!(id.username, "alice");
  assert!(s.find_identity("alice").await.unwrap().is_some());
}

#[tokio::test]
async fn touch_last_login_updates_only_that_field() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  s.touch_last_login(alice.identity_id, NOW + 5000).await.unwrap();

  let found = s.find_identity("alice").await.unwrap().unwrap();
  assert_eq!(found.last_login, NOW + 5000);
  assert_eq!(found.created_at, NOW);
}

#[tokio::test]
async fn touch_last_login_unknown_identity_fails() {
  let s = store().await;
  let err = s.touch_last_login(Uuid::new_v4(), NOW).await.unwrap_err();
  assert!(matches!(err, Error::IdentityNotFound(_)));
}

#[tokio::test]
async fn set_password_hash_replaces_hash() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  s.set_password_hash(alice.identity_id, "new-hash".into())
    .await
    .unwrap();

  let found = s.find_identity("alice").await.unwrap().unwrap();
  assert_eq!(found.password_hash, "new-hash");
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_profile_then_find_by_owner_and_username() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let mut input = NewProfile::empty(alice.identity_id, "alice".into(), NOW);
  input.name = Some("Alice Liddell".into());
  let profile = s.save_profile(input).await.unwrap();
  assert_eq!(profile.name.as_deref(), Some("Alice Liddell"));

  let by_owner = s.find_profile_by_owner(alice.identity_id).await.unwrap();
  assert!(by_owner.is_some());
  let by_name = s.find_profile_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_name.profile_id, profile.profile_id);
}

#[tokio::test]
async fn saving_again_updates_in_place() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let first = s
    .save_profile(NewProfile::empty(alice.identity_id, "alice".into(), NOW))
    .await
    .unwrap();

  let mut second = NewProfile::empty(alice.identity_id, "alice".into(), NOW + 1000);
  second.location = Some("Wonderland".into());
  let updated = s.save_profile(second).await.unwrap();

  // Same row, new fields; creation instant survives the upsert.
  assert_eq!(updated.profile_id, first.profile_id);
  assert_eq!(updated.location.as_deref(), Some("Wonderland"));
  assert_eq!(updated.timestamps.created_at, NOW);
  assert_eq!(updated.timestamps.updated_at, NOW + 1000);
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_item_defaults_all_flags_false() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let item = s
    .add_item(new_item(&alice, "foo.com", "news,tech", NOW))
    .await
    .unwrap();
  assert_eq!(item.url, "http://foo.com");
  assert!(!item.liked && !item.archived && !item.deleted);

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(fetched.tags, vec!["news", "tech"]);
  assert_eq!(fetched.ownership.owner, alice.identity_id);
}

#[tokio::test]
async fn get_item_missing_returns_none() {
  let s = store().await;
  assert!(s.get_item(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn items_by_owner_orders_by_recency() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let older = s.add_item(new_item(&alice, "old.com", "", NOW - 1000)).await.unwrap();
  let newer = s.add_item(new_item(&alice, "new.com", "", NOW)).await.unwrap();

  let items = s
    .items_by_owner(alice.identity_id, &ItemFilter::default())
    .await
    .unwrap();
  assert_eq!(items.len(), 2);
  assert_eq!(items[0].item_id, newer.item_id);
  assert_eq!(items[1].item_id, older.item_id);
}

#[tokio::test]
async fn items_by_owner_is_owner_scoped() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob = register(&s, "bob").await;

  s.add_item(new_item(&alice, "alice.com", "", NOW)).await.unwrap();
  s.add_item(new_item(&bob, "bob.com", "", NOW)).await.unwrap();

  let items = s
    .items_by_owner(alice.identity_id, &ItemFilter::default())
    .await
    .unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].url, "http://alice.com");
}

#[tokio::test]
async fn tag_filter_is_a_logical_or() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  s.add_item(new_item(&alice, "a.com", "news", NOW)).await.unwrap();
  s.add_item(new_item(&alice, "b.com", "tech", NOW)).await.unwrap();
  s.add_item(new_item(&alice, "c.com", "cooking", NOW)).await.unwrap();

  let filter = ItemFilter {
    tags: vec!["news".into(), "tech".into()],
    ..ItemFilter::default()
  };
  let items = s.items_by_owner(alice.identity_id, &filter).await.unwrap();
  assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn tri_state_archived_filter() {
  let s = store().await;
  let alice = register(&s, "alice").await;

  let kept = s.add_item(new_item(&alice, "kept.com", "", NOW)).await.unwrap();
  let filed = s.add_item(new_item(&alice, "filed.com", "", NOW)).await.unwrap();
  apply_transition(&s, alice.identity_id, filed.item_id, Transition::Archive)
    .await
    .unwrap();

  let archived_only = ItemFilter { archived: Some(true), ..ItemFilter::default() };
  let items = s.items_by_owner(alice.identity_id, &archived_only).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].item_id, filed.item_id);

  let unarchived_only = ItemFilter { archived: Some(false), ..ItemFilter::default() };
  let items = s.items_by_owner(alice.identity_id, &unarchived_only).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].item_id, kept.item_id);

  // Unset means any.
  let items = s
    .items_by_owner(alice.identity_id, &ItemFilter::default())
    .await
    .unwrap();
  assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn items_by_username_returns_deleted_rows_too() {
  // Visibility policy for deleted items belongs to the presentation
  // layer; the repository reports every matching row.
  let s = store().await;
  let alice = register(&s, "alice").await;

  let item = s.add_item(new_item(&alice, "gone.com", "", NOW)).await.unwrap();
  apply_transition(&s, alice.identity_id, item.item_id, Transition::Delete)
    .await
    .unwrap();

  let items = s
    .items_by_username("alice", &ItemFilter::default())
    .await
    .unwrap();
  assert_eq!(items.len(), 1);
  assert!(items[0].deleted);
}

// ─── Flag updates ────────────────────────────────────────────────────────────

#[tokio::test]
async fn transitions_are_idempotent() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let item = s.add_item(new_item(&alice, "foo.com", "", NOW)).await.unwrap();

  for _ in 0..2 {
    let matched =
      apply_transition(&s, alice.identity_id, item.item_id, Transition::Archive)
        .await
        .unwrap();
    assert!(matched);
  }

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(fetched.archived);
  assert!(!fetched.liked && !fetched.deleted);
}

#[tokio::test]
async fn like_and_archive_are_independent() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let item = s.add_item(new_item(&alice, "foo.com", "", NOW)).await.unwrap();

  apply_transition(&s, alice.identity_id, item.item_id, Transition::Like)
    .await
    .unwrap();
  apply_transition(&s, alice.identity_id, item.item_id, Transition::Archive)
    .await
    .unwrap();

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(fetched.liked && fetched.archived);

  apply_transition(&s, alice.identity_id, item.item_id, Transition::Unlike)
    .await
    .unwrap();
  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(!fetched.liked);
  assert!(fetched.archived, "unlike must not disturb archived");
}

#[tokio::test]
async fn delete_is_a_flag_flip_not_a_row_removal() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let item = s.add_item(new_item(&alice, "foo.com", "", NOW)).await.unwrap();

  apply_transition(&s, alice.identity_id, item.item_id, Transition::Delete)
    .await
    .unwrap();
  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(fetched.deleted);

  apply_transition(&s, alice.identity_id, item.item_id, Transition::Undelete)
    .await
    .unwrap();
  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(!fetched.deleted);
}

#[tokio::test]
async fn update_against_foreign_item_fails_without_writing() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob = register(&s, "bob").await;
  let item = s.add_item(new_item(&alice, "foo.com", "", NOW)).await.unwrap();

  let matched =
    apply_transition(&s, bob.identity_id, item.item_id, Transition::Archive)
      .await
      .unwrap();
  assert!(!matched);

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(!fetched.archived, "alice's item must be untouched");
}

#[tokio::test]
async fn empty_patch_changes_nothing() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let item = s.add_item(new_item(&alice, "foo.com", "", NOW)).await.unwrap();

  let matched = s
    .update_flags(alice.identity_id, item.item_id, &FlagPatch::default())
    .await
    .unwrap();
  assert!(matched);

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert!(!fetched.liked && !fetched.archived && !fetched.deleted);
}
