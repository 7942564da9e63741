//! Storage engine
//!
//! A uniform CRUD interface over two interchangeable backends:
//!
//! - [`FileStorage`]: every entity held in memory and written to a single
//!   JSON file on each mutation
//! - [`PgStorage`]: one PostgreSQL table per entity kind plus a
//!   `place_amenity` join table
//!
//! Handlers only ever see `Arc<dyn Storage>`; the backend is chosen once at
//! startup by [`StorageConfig`].

use async_trait::async_trait;
use std::{env, path::PathBuf, sync::Arc};
use tracing::info;

use crate::{
    database::{self, DatabaseConfig},
    error::{StorageError, StorageResult},
    models::{Amenity, City, Entity, EntityKind, Model, Place, Review},
};

mod file;
mod postgres;

pub use file::FileStorage;
pub use postgres::PgStorage;

/// Backend-agnostic storage operations
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch one entity; `None` when the id is unknown
    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>>;

    /// Every stored entity, optionally restricted to one kind
    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<Vec<Entity>>;

    /// Number of stored entities, optionally restricted to one kind
    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize>;

    /// Register a new entity or persist changes to an existing one.
    /// Refreshes `updated_at` and returns the entity as stored.
    async fn save(&self, entity: Entity) -> StorageResult<Entity>;

    /// Remove an entity; returns whether it existed
    async fn delete(&self, kind: EntityKind, id: &str) -> StorageResult<bool>;

    /// Re-read persisted state
    async fn reload(&self) -> StorageResult<()>;

    /// Release backend resources
    async fn close(&self) -> StorageResult<()>;

    /// Link an amenity to a place; `false` when the link already existed
    async fn add_amenity(&self, place_id: &str, amenity_id: &str) -> StorageResult<bool>;

    /// Unlink an amenity from a place; `false` when they were not linked
    async fn remove_amenity(&self, place_id: &str, amenity_id: &str) -> StorageResult<bool>;

    /// Amenities linked to a place
    async fn amenities_of(&self, place_id: &str) -> StorageResult<Vec<Amenity>>;

    /// Cities of a state
    async fn cities_of(&self, state_id: &str) -> StorageResult<Vec<City>> {
        let cities = typed::<City>(self.all(Some(EntityKind::City)).await?);
        Ok(cities
            .into_iter()
            .filter(|city| city.state_id == state_id)
            .collect())
    }

    /// Places of a city
    async fn places_of(&self, city_id: &str) -> StorageResult<Vec<Place>> {
        let places = typed::<Place>(self.all(Some(EntityKind::Place)).await?);
        Ok(places
            .into_iter()
            .filter(|place| place.city_id == city_id)
            .collect())
    }

    /// Reviews of a place
    async fn reviews_of(&self, place_id: &str) -> StorageResult<Vec<Review>> {
        let reviews = typed::<Review>(self.all(Some(EntityKind::Review)).await?);
        Ok(reviews
            .into_iter()
            .filter(|review| review.place_id == place_id)
            .collect())
    }
}

impl dyn Storage {
    /// Fetch one entity as its concrete type
    pub async fn find<M: Model>(&self, id: &str) -> StorageResult<Option<M>> {
        Ok(self.get(M::KIND, id).await?.and_then(M::from_entity))
    }

    /// Every entity of one concrete type
    pub async fn list<M: Model>(&self) -> StorageResult<Vec<M>> {
        Ok(typed(self.all(Some(M::KIND)).await?))
    }

    /// Save a concrete entity and hand it back as stored
    pub async fn persist<M: Model>(&self, model: M) -> StorageResult<M> {
        let saved = self.save(model.into_entity()).await?;
        let kind = saved.kind();
        M::from_entity(saved).ok_or_else(|| {
            StorageError::UnexpectedRecord(format!("expected {}, got {}", M::KIND, kind))
        })
    }

    /// Remove a concrete entity
    pub async fn remove<M: Model>(&self, model: &M) -> StorageResult<bool> {
        self.delete(M::KIND, model.id()).await
    }
}

fn typed<M: Model>(entities: Vec<Entity>) -> Vec<M> {
    entities.into_iter().filter_map(M::from_entity).collect()
}

/// Which backend to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    /// JSON file at the given path
    File(PathBuf),
    /// PostgreSQL
    Database,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HBNB_TYPE_STORAGE`: `db` selects PostgreSQL, anything else the file backend
    /// - `HBNB_FILE_PATH`: file backend path (default: "file.json")
    pub fn from_env() -> Self {
        let kind = match env::var("HBNB_TYPE_STORAGE").as_deref() {
            Ok("db") => StorageKind::Database,
            _ => StorageKind::File(
                env::var("HBNB_FILE_PATH")
                    .unwrap_or_else(|_| "file.json".to_string())
                    .into(),
            ),
        };

        Self { kind }
    }
}

/// Build the configured backend and load its persisted state
pub async fn connect(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match &config.kind {
        StorageKind::File(path) => {
            info!("Using file storage at {}", path.display());
            Arc::new(FileStorage::new(path.clone()))
        }
        StorageKind::Database => {
            info!("Using database storage");
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;
            Arc::new(PgStorage::from_pool(pool).await?)
        }
    };

    storage.reload().await?;
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_storage_config_defaults_to_file() {
        unsafe {
            std::env::remove_var("HBNB_TYPE_STORAGE");
            std::env::remove_var("HBNB_FILE_PATH");
        }

        let config = StorageConfig::from_env();
        assert_eq!(config.kind, StorageKind::File(PathBuf::from("file.json")));
    }

    #[test]
    #[serial]
    fn test_storage_config_selects_database() {
        unsafe {
            std::env::set_var("HBNB_TYPE_STORAGE", "db");
        }

        let config = StorageConfig::from_env();
        assert_eq!(config.kind, StorageKind::Database);

        unsafe {
            std::env::set_var("HBNB_TYPE_STORAGE", "file");
            std::env::set_var("HBNB_FILE_PATH", "/tmp/hbnb.json");
        }

        let config = StorageConfig::from_env();
        assert_eq!(config.kind, StorageKind::File(PathBuf::from("/tmp/hbnb.json")));

        unsafe {
            std::env::remove_var("HBNB_TYPE_STORAGE");
            std::env::remove_var("HBNB_FILE_PATH");
        }
    }
}
