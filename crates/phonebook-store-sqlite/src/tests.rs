//! Integration tests for `SqliteStore` against an in-memory database.

use phonebook_core::{
  bulk::InvalidReason,
  contact::Upserted,
  store::{ContactStore, DeleteKey, DeleteRequest, Page},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn strings(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

/// Store with contacts `C1`..`C10`, phones `5550001`..`5550010`.
async fn store_with_ten() -> SqliteStore {
  let s = store().await;
  for i in 1..=10 {
    s.upsert(format!("C{i}"), format!("55500{i:02}")).await.unwrap();
  }
  s
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_schema_is_idempotent() {
  let s = store().await;
  s.upsert("Ann".into(), "5551234".into()).await.unwrap();
  s.ensure_schema().await.unwrap();
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn open_on_disk_persists_between_opens() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("phonebook.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.upsert("Ann".into(), "5551234".into()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let all = s.list(Page::new(10, 0)).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].name, "Ann");
}

#[tokio::test]
async fn open_in_missing_directory_is_a_connect_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("no-such-dir").join("phonebook.db");

  let err = SqliteStore::open(&path).await.err().expect("open should fail");
  assert!(matches!(err, Error::Connect { .. }));
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_inserts_new_contact() {
  let s = store().await;

  let up = s.upsert("Ann".into(), "5551234".into()).await.unwrap();
  assert!(matches!(up, Upserted::Inserted(_)));

  let fetched = s.get(up.contact().id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Ann");
  assert_eq!(fetched.phone, "5551234");
}

#[tokio::test]
async fn upsert_twice_leaves_one_contact() {
  let s = store().await;
  s.upsert("Ann".into(), "5551234".into()).await.unwrap();
  let second = s.upsert("Ann".into(), "5551234".into()).await.unwrap();

  assert!(matches!(second, Upserted::Updated(_)));
  let hits = s.search("Ann".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].phone, "5551234");
}

#[tokio::test]
async fn upsert_existing_name_replaces_phone() {
  let s = store().await;
  let first = s.upsert("Ann".into(), "5551111".into()).await.unwrap();
  let second = s.upsert("Ann".into(), "5552222".into()).await.unwrap();

  assert_eq!(second.contact().id, first.contact().id);
  assert!(s.search("5551111".into()).await.unwrap().is_empty());
  let hits = s.search("Ann".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].phone, "5552222");
}

#[tokio::test]
async fn upsert_phone_of_other_contact_is_a_conflict() {
  let s = store().await;
  s.upsert("Ann".into(), "5551234".into()).await.unwrap();

  let err = s.upsert("Bob".into(), "5551234".into()).await.unwrap_err();
  assert!(matches!(err, Error::Conflict { ref phone } if phone == "5551234"));

  // Update path as well.
  s.upsert("Cid".into(), "5559999".into()).await.unwrap();
  let err = s.upsert("Cid".into(), "5551234".into()).await.unwrap_err();
  assert!(matches!(err, Error::Conflict { .. }));
  assert_eq!(s.count().await.unwrap(), 2);
}

#[tokio::test]
async fn upsert_does_not_validate_phone() {
  let s = store().await;
  let up = s.upsert("Ann".into(), "ext. 42".into()).await.unwrap();
  assert_eq!(up.contact().phone, "ext. 42");
}

#[tokio::test]
async fn upsert_updates_lowest_id_among_namesakes() {
  let s = store().await;
  let report = s
    .bulk_insert(strings(&["Ann", "Ann"]), strings(&["5550001", "5550002"]))
    .await
    .unwrap();
  assert_eq!(report.inserted, 2);

  let up = s.upsert("Ann".into(), "5550003".into()).await.unwrap();
  let all = s.list(Page::new(10, 0)).await.unwrap();
  assert_eq!(up.contact().id, all[0].id);
  assert_eq!(all[0].phone, "5550003");
  assert_eq!(all[1].phone, "5550002");
}

// ─── Bulk insert ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_insert_partial_success() {
  let s = store().await;
  let report = s
    .bulk_insert(strings(&["A", "B", "C"]), strings(&["1234567", "bad", "7654321"]))
    .await
    .unwrap();

  assert_eq!(report.inserted, 2);
  assert_eq!(report.skipped_duplicates, 0);
  assert_eq!(report.invalid_pairs(), [("B", "bad")]);
  assert_eq!(report.invalid[0].reason, InvalidReason::MalformedPhone);

  assert_eq!(s.search("A".into()).await.unwrap().len(), 1);
  assert!(s.search("B".into()).await.unwrap().is_empty());
  assert_eq!(s.search("C".into()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn bulk_insert_skips_existing_phone() {
  let s = store().await;
  s.upsert("Ann".into(), "5551234".into()).await.unwrap();

  let report = s
    .bulk_insert(strings(&["X"]), strings(&["5551234"]))
    .await
    .unwrap();

  assert_eq!(report.inserted, 0);
  assert_eq!(report.skipped_duplicates, 1);
  assert!(report.invalid.is_empty());
  assert!(s.search("X".into()).await.unwrap().is_empty());
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn bulk_insert_skips_duplicates_within_batch() {
  let s = store().await;
  let report = s
    .bulk_insert(strings(&["A", "B"]), strings(&["5551234", "5551234"]))
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped_duplicates, 1);
  assert!(report.invalid.is_empty());
}

#[tokio::test]
async fn bulk_insert_reports_rejected_rows_and_continues() {
  let s = store().await;
  let long_name = "x".repeat(51);
  let report = s
    .bulk_insert(
      vec![long_name.clone(), "Ok".into()],
      strings(&["5550001", "5550002"]),
    )
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.invalid.len(), 1);
  assert_eq!(report.invalid[0].name, long_name);
  assert!(matches!(report.invalid[0].reason, InvalidReason::Rejected(_)));
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn bulk_insert_length_mismatch_touches_nothing() {
  let s = store().await;
  let err = s
    .bulk_insert(strings(&["A", "B"]), strings(&["5550001"]))
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    Error::Core(phonebook_core::Error::LengthMismatch { names: 2, phones: 1 })
  ));
  assert_eq!(s.count().await.unwrap(), 0);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_name_or_phone_case_insensitively() {
  let s = store().await;
  s.upsert("Alice".into(), "+1 555 0100".into()).await.unwrap();
  s.upsert("Malik".into(), "7770000".into()).await.unwrap();
  s.upsert("Bob".into(), "8880000".into()).await.unwrap();

  let hits = s.search("LI".into()).await.unwrap();
  let names: Vec<_> = hits.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["Alice", "Malik"]);

  let hits = s.search("555".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Alice");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.upsert("100%_real".into(), "5550001".into()).await.unwrap();
  s.upsert("plain".into(), "5550002".into()).await.unwrap();

  let hits = s.search("%_".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "100%_real");
}

#[tokio::test]
async fn search_without_hits_is_empty_not_error() {
  let s = store_with_ten().await;
  assert!(s.search("nobody".into()).await.unwrap().is_empty());
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_pages_in_id_order() {
  let s = store_with_ten().await;

  let page = s.list(Page::new(3, 3)).await.unwrap();
  let names: Vec<_> = page.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["C4", "C5", "C6"]);

  assert_eq!(s.list(Page::new(3, 9)).await.unwrap().len(), 1);
  assert!(s.list(Page::new(3, 10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_by_page_number() {
  let s = store_with_ten().await;

  let page = s.list(Page::number(2, 3).unwrap()).await.unwrap();
  assert_eq!(page[0].name, "C4");

  let last = s.list(Page::number(4, 3).unwrap()).await.unwrap();
  assert_eq!(last.len(), 1);
  assert_eq!(last[0].name, "C10");
}

#[tokio::test]
async fn list_with_zero_limit_is_empty() {
  let s = store_with_ten().await;
  assert!(s.list(Page::new(0, 0)).await.unwrap().is_empty());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_name_removes_all_namesakes() {
  let s = store().await;
  s.bulk_insert(
    strings(&["Alice", "Alice", "Bob"]),
    strings(&["5550001", "5550002", "5550003"]),
  )
  .await
  .unwrap();

  let removed = s.delete(DeleteKey::Name("Alice".into())).await.unwrap();
  assert_eq!(removed, 2);

  let left = s.list(Page::new(10, 0)).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].name, "Bob");
}

#[tokio::test]
async fn delete_by_phone_removes_exact_match_only() {
  let s = store().await;
  s.upsert("Ann".into(), "5550001".into()).await.unwrap();
  s.upsert("Bob".into(), "55500011".into()).await.unwrap();

  let key = DeleteRequest { name: None, phone: Some("5550001".into()) }
    .resolve()
    .unwrap();
  assert_eq!(s.delete(key).await.unwrap(), 1);

  let left = s.list(Page::new(10, 0)).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].name, "Bob");
}

#[tokio::test]
async fn delete_unknown_key_removes_nothing() {
  let s = store_with_ten().await;
  assert_eq!(s.delete(DeleteKey::Name("Nobody".into())).await.unwrap(), 0);
  assert_eq!(s.count().await.unwrap(), 10);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
  let s = store().await;
  let first = s.upsert("Ann".into(), "5550001".into()).await.unwrap();
  s.delete(DeleteKey::Name("Ann".into())).await.unwrap();

  let second = s.upsert("Ann".into(), "5550001".into()).await.unwrap();
  assert!(second.contact().id > first.contact().id);
  assert!(s.get(first.contact().id).await.unwrap().is_none());
}
