use chrono::{Duration, TimeZone, Utc};
use portfolio_core::db::migrations::latest_version;
use portfolio_core::db::{open_db, DbError};
use portfolio_core::{
    FixedClock, NewProject, ProjectPatch, ProjectStore, SqliteProjectStore, StoreError,
};
use rusqlite::Connection;
use std::sync::Arc;

#[tokio::test]
async fn create_get_list_roundtrip_in_insertion_order() {
    let store = SqliteProjectStore::open_in_memory().unwrap();

    let mut input = NewProject::new("First", "one", ["React", "Node.js"]);
    input.github_url = Some("https://github.com/example/first".to_string());
    let first = store.create(input).await.unwrap();
    let second = store
        .create(NewProject::new("Second", "two", ["Rust"]))
        .await
        .unwrap();

    assert_eq!(store.get(&first.id).await.unwrap(), first);
    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![first, second]);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn update_merges_patch_and_advances_updated_at() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));
    let store = SqliteProjectStore::open_in_memory()
        .unwrap()
        .with_clock(clock.clone());

    let mut input = NewProject::new("Demo", "d", ["Go"]);
    input.image_url = Some("https://example.com/cover.png".to_string());
    let created = store.create(input).await.unwrap();

    let patch = ProjectPatch {
        technologies: Some(vec!["Go".to_string(), "Rust".to_string()]),
        image_url: Some(None),
        ..ProjectPatch::default()
    };
    let stalled = store.update(&created.id, patch).await.unwrap();
    assert_eq!(stalled.technologies, vec!["Go", "Rust"]);
    assert_eq!(stalled.image_url, None);
    assert_eq!(stalled.title, "Demo");
    assert_eq!(stalled.created_at, created.created_at);
    assert!(stalled.updated_at > created.updated_at);

    clock.advance(Duration::hours(1));
    let later = store
        .update(&created.id, ProjectPatch::default())
        .await
        .unwrap();
    assert_eq!(later.updated_at, created.created_at + Duration::hours(1));
    assert_eq!(store.get(&created.id).await.unwrap(), later);
}

#[tokio::test]
async fn missing_id_fails_with_not_found() {
    let store = SqliteProjectStore::open_in_memory().unwrap();

    assert!(matches!(
        store.get("missing-id").await,
        Err(StoreError::NotFound(id)) if id == "missing-id"
    ));
    assert!(matches!(
        store.update("missing-id", ProjectPatch::default()).await,
        Err(StoreError::NotFound(id)) if id == "missing-id"
    ));
    assert!(matches!(
        store.delete("missing-id").await,
        Err(StoreError::NotFound(id)) if id == "missing-id"
    ));
}

#[tokio::test]
async fn delete_removes_exactly_one_row() {
    let store = SqliteProjectStore::open_in_memory().unwrap();
    let keep = store.create(NewProject::new("keep", "", ["A"])).await.unwrap();
    let doomed = store.create(NewProject::new("doomed", "", ["B"])).await.unwrap();

    store.delete(&doomed.id).await.unwrap();
    let remaining = store.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
    assert!(store.delete(&doomed.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio.sqlite3");

    let created = {
        let store = SqliteProjectStore::new(open_db(&path).unwrap()).unwrap();
        store
            .create(NewProject::new("Persisted", "d", ["SQLite"]))
            .await
            .unwrap()
    };

    let reopened = SqliteProjectStore::new(open_db(&path).unwrap()).unwrap();
    assert_eq!(reopened.list().await.unwrap(), vec![created]);
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteProjectStore::new(conn) {
        Err(StoreError::Db(DbError::SchemaMismatch {
            db_version: 0,
            expected,
        })) => assert_eq!(expected, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected schema mismatch"),
    }
}
