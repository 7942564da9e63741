//! Integration tests for the file storage backend

mod support;

use common::{
    models::{EntityKind, NewState, NewUser, State, User},
    storage::{FileStorage, Storage, StorageConfig, StorageKind, connect},
};
use std::sync::Arc;
use tempfile::TempDir;

async fn file_storage(dir: &TempDir) -> Arc<dyn Storage> {
    let config = StorageConfig {
        kind: StorageKind::File(dir.path().join("file.json")),
    };
    connect(&config).await.expect("file storage should start")
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let dir = TempDir::new().unwrap();
    support::create_then_get_round_trips(&file_storage(&dir).await).await;
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let dir = TempDir::new().unwrap();
    support::delete_then_get_is_not_found(&file_storage(&dir).await).await;
}

#[tokio::test]
async fn test_count_tracks_creates_and_deletes() {
    let dir = TempDir::new().unwrap();
    support::count_tracks_creates_and_deletes(&file_storage(&dir).await).await;
}

#[tokio::test]
async fn test_save_refreshes_updated_at() {
    let dir = TempDir::new().unwrap();
    support::save_refreshes_updated_at(&file_storage(&dir).await).await;
}

#[tokio::test]
async fn test_relationships_follow_foreign_keys() {
    let dir = TempDir::new().unwrap();
    support::relationships_follow_foreign_keys(&file_storage(&dir).await).await;
}

#[tokio::test]
async fn test_amenity_links_are_unique() {
    let dir = TempDir::new().unwrap();
    support::amenity_links_are_unique(&file_storage(&dir).await).await;
}

#[tokio::test]
async fn test_reload_reflects_persisted_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("file.json");

    let writer: Arc<dyn Storage> = Arc::new(FileStorage::new(&path));
    let state = writer
        .persist(State::new(NewState {
            name: "Vermont".to_string(),
        }))
        .await
        .unwrap();
    let user = writer
        .persist(
            User::new(NewUser {
                email: "owner@example.com".to_string(),
                password: "hunter2".to_string(),
                ..Default::default()
            })
            .unwrap(),
        )
        .await
        .unwrap();

    let reader: Arc<dyn Storage> = Arc::new(FileStorage::new(&path));
    assert_eq!(reader.count(None).await.unwrap(), 0);

    reader.reload().await.unwrap();
    assert_eq!(reader.count(None).await.unwrap(), 2);
    assert_eq!(reader.count(Some(EntityKind::State)).await.unwrap(), 1);

    let loaded: State = reader.find(&state.id).await.unwrap().unwrap();
    assert_eq!(loaded, state);

    let loaded: User = reader.find(&user.id).await.unwrap().unwrap();
    assert!(loaded.verify_password("hunter2"));
}

#[tokio::test]
async fn test_reload_drops_unsaved_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("file.json");

    let first: Arc<dyn Storage> = Arc::new(FileStorage::new(&path));
    let second: Arc<dyn Storage> = Arc::new(FileStorage::new(&path));

    first
        .persist(State::new(NewState {
            name: "Maine".to_string(),
        }))
        .await
        .unwrap();
    second
        .persist(State::new(NewState {
            name: "Kansas".to_string(),
        }))
        .await
        .unwrap();

    // The second writer overwrote the file with its own view
    first.reload().await.unwrap();
    let names: Vec<String> = first
        .list::<State>()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Kansas"]);
}
