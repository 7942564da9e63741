//! File-backed storage
//!
//! All entities live in an in-memory map keyed `<Class>.<id>`. The whole map
//! is written to one JSON file after every mutation and read back on
//! [`Storage::reload`]. Mutations hold the write lock while the file is
//! written, so concurrent writers cannot interleave.

use async_trait::async_trait;
use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::Storage;
use crate::{
    error::StorageResult,
    models::{Amenity, Entity, EntityKind, Model, storage_key},
};

type Objects = BTreeMap<String, Entity>;

/// JSON file storage backend
pub struct FileStorage {
    path: PathBuf,
    objects: RwLock<Objects>,
}

impl FileStorage {
    /// Create an empty store bound to `path`. Call [`Storage::reload`] to
    /// load what the file already holds.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn write_file(&self, objects: &Objects) -> StorageResult<()> {
        let contents = serde_json::to_vec(objects)?;
        tokio::fs::write(&self.path, contents).await?;
        debug!("Wrote {} objects to {}", objects.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>> {
        let objects = self.objects.read().await;
        Ok(objects.get(&storage_key(kind, id)).cloned())
    }

    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<Vec<Entity>> {
        let objects = self.objects.read().await;
        Ok(objects
            .values()
            .filter(|entity| kind.is_none_or(|kind| entity.kind() == kind))
            .cloned()
            .collect())
    }

    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize> {
        let objects = self.objects.read().await;
        Ok(match kind {
            Some(kind) => objects.values().filter(|e| e.kind() == kind).count(),
            None => objects.len(),
        })
    }

    async fn save(&self, mut entity: Entity) -> StorageResult<Entity> {
        entity.touch();

        let mut objects = self.objects.write().await;
        if let Entity::Place(place) = &mut entity {
            // Links only change through the association operations
            place.amenity_ids = match objects.get(&storage_key(EntityKind::Place, &place.id)) {
                Some(Entity::Place(stored)) => stored.amenity_ids.clone(),
                _ => Vec::new(),
            };
        }
        objects.insert(entity.key(), entity.clone());
        self.write_file(&objects).await?;

        info!("Saved {}", entity.key());
        Ok(entity)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StorageResult<bool> {
        let mut objects = self.objects.write().await;
        if objects.remove(&storage_key(kind, id)).is_none() {
            return Ok(false);
        }

        // A deleted amenity must not linger in place association lists
        if kind == EntityKind::Amenity {
            for entity in objects.values_mut() {
                if let Entity::Place(place) = entity {
                    place.amenity_ids.retain(|amenity_id| amenity_id != id);
                }
            }
        }

        self.write_file(&objects).await?;

        info!("Deleted {}", storage_key(kind, id));
        Ok(true)
    }

    async fn reload(&self) -> StorageResult<()> {
        let loaded: Objects = match tokio::fs::read(&self.path).await {
            Ok(contents) => serde_json::from_slice(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} objects from {}", loaded.len(), self.path.display());
        *self.objects.write().await = loaded;
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        let objects = self.objects.read().await;
        self.write_file(&objects).await
    }

    async fn add_amenity(&self, place_id: &str, amenity_id: &str) -> StorageResult<bool> {
        let mut objects = self.objects.write().await;
        let Some(Entity::Place(place)) = objects.get_mut(&storage_key(EntityKind::Place, place_id))
        else {
            return Ok(false);
        };

        if place.has_amenity(amenity_id) {
            return Ok(false);
        }
        place.amenity_ids.push(amenity_id.to_string());
        self.write_file(&objects).await?;

        info!("Linked Amenity.{} to Place.{}", amenity_id, place_id);
        Ok(true)
    }

    async fn remove_amenity(&self, place_id: &str, amenity_id: &str) -> StorageResult<bool> {
        let mut objects = self.objects.write().await;
        let Some(Entity::Place(place)) = objects.get_mut(&storage_key(EntityKind::Place, place_id))
        else {
            return Ok(false);
        };

        if !place.has_amenity(amenity_id) {
            return Ok(false);
        }
        place.amenity_ids.retain(|id| id != amenity_id);
        self.write_file(&objects).await?;

        info!("Unlinked Amenity.{} from Place.{}", amenity_id, place_id);
        Ok(true)
    }

    async fn amenities_of(&self, place_id: &str) -> StorageResult<Vec<Amenity>> {
        let objects = self.objects.read().await;
        let Some(Entity::Place(place)) = objects.get(&storage_key(EntityKind::Place, place_id))
        else {
            return Ok(Vec::new());
        };

        Ok(place
            .amenity_ids
            .iter()
            .filter_map(|id| objects.get(&storage_key(EntityKind::Amenity, id)))
            .cloned()
            .filter_map(Amenity::from_entity)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAmenity, NewPlace, NewState, Place, State};
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> FileStorage {
        FileStorage::new(dir.path().join("file.json"))
    }

    #[tokio::test]
    async fn test_reload_without_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.reload().await.unwrap();
        assert_eq!(storage.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_writes_class_keyed_records() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let state = State::new(NewState {
            name: "Oregon".to_string(),
        });
        let key = format!("State.{}", state.id);

        storage.save(state.into_entity()).await.unwrap();

        let contents = std::fs::read_to_string(storage.path()).unwrap();
        let file: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(file[&key]["__class__"], "State");
        assert_eq!(file[&key]["name"], "Oregon");
    }

    #[tokio::test]
    async fn test_reload_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        std::fs::write(storage.path(), b"{not json").unwrap();

        assert!(storage.reload().await.is_err());
    }

    #[tokio::test]
    async fn test_deleting_amenity_unlinks_it() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let place = Place::new("city-1", NewPlace::default());
        let amenity = Amenity::new(NewAmenity {
            name: "Wifi".to_string(),
        });
        let place_id = place.id.clone();
        let amenity_id = amenity.id.clone();
        storage.save(place.into_entity()).await.unwrap();
        storage.save(amenity.into_entity()).await.unwrap();

        assert!(storage.add_amenity(&place_id, &amenity_id).await.unwrap());
        assert!(
            storage
                .delete(EntityKind::Amenity, &amenity_id)
                .await
                .unwrap()
        );

        let place = storage.get(EntityKind::Place, &place_id).await.unwrap();
        let Some(Entity::Place(place)) = place else {
            panic!("place should still exist");
        };
        assert!(place.amenity_ids.is_empty());
    }

    #[tokio::test]
    async fn test_add_amenity_to_unknown_place() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert!(!storage.add_amenity("missing", "amenity").await.unwrap());
        assert!(storage.amenities_of("missing").await.unwrap().is_empty());
    }
}
