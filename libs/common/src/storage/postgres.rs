//! PostgreSQL storage backend
//!
//! One table per entity kind, plus `place_amenity` for the many-to-many link
//! between places and amenities. Entity tables carry no foreign-key
//! constraints: referential checks happen before a save, and deleting a
//! parent never cascades to its children.
//!
//! Every operation checks a connection out of the pool for its own duration
//! only.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row, postgres::PgRow};
use tracing::info;

use super::Storage;
use crate::{
    error::{DatabaseError, StorageError, StorageResult},
    models::{Amenity, City, Entity, EntityKind, Place, Review, State, User},
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS states (
        id VARCHAR(60) PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        name VARCHAR(128) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        id VARCHAR(60) PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        name VARCHAR(128) NOT NULL,
        state_id VARCHAR(60) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS amenities (
        id VARCHAR(60) PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        name VARCHAR(128) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id VARCHAR(60) PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        email VARCHAR(128) NOT NULL,
        password VARCHAR(128) NOT NULL,
        first_name VARCHAR(128) NOT NULL DEFAULT '',
        last_name VARCHAR(128) NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS places (
        id VARCHAR(60) PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        city_id VARCHAR(60) NOT NULL,
        user_id VARCHAR(60) NOT NULL,
        name VARCHAR(128) NOT NULL,
        description VARCHAR(1024) NOT NULL DEFAULT '',
        number_rooms INTEGER NOT NULL DEFAULT 0,
        number_bathrooms INTEGER NOT NULL DEFAULT 0,
        max_guest INTEGER NOT NULL DEFAULT 0,
        price_by_night INTEGER NOT NULL DEFAULT 0,
        latitude DOUBLE PRECISION NOT NULL DEFAULT 0,
        longitude DOUBLE PRECISION NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id VARCHAR(60) PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        place_id VARCHAR(60) NOT NULL,
        user_id VARCHAR(60) NOT NULL,
        text VARCHAR(1024) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS place_amenity (
        place_id VARCHAR(60) NOT NULL,
        amenity_id VARCHAR(60) NOT NULL,
        PRIMARY KEY (place_id, amenity_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_cities_state_id ON cities(state_id)",
    "CREATE INDEX IF NOT EXISTS idx_places_city_id ON places(city_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_place_id ON reviews(place_id)",
];

/// PostgreSQL storage backend
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing pool, creating the schema if needed
    pub async fn from_pool(pool: PgPool) -> StorageResult<Self> {
        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> StorageResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(DatabaseError::Migration)?;
        }
        info!("Database schema ready");
        Ok(())
    }

    async fn fetch_kind(&self, kind: EntityKind) -> StorageResult<Vec<Entity>> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at", kind.collection());
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            entities.push(self.decode(kind, &row).await?);
        }
        Ok(entities)
    }

    async fn decode(&self, kind: EntityKind, row: &PgRow) -> StorageResult<Entity> {
        let entity = match kind {
            EntityKind::Amenity => Entity::Amenity(Amenity::from_row(row)?),
            EntityKind::City => Entity::City(City::from_row(row)?),
            EntityKind::Review => Entity::Review(Review::from_row(row)?),
            EntityKind::State => Entity::State(State::from_row(row)?),
            EntityKind::User => Entity::User(User::from_row(row)?),
            EntityKind::Place => {
                let mut place = Place::from_row(row)?;
                place.amenity_ids = self.amenity_ids(&place.id).await?;
                Entity::Place(place)
            }
        };
        Ok(entity)
    }

    async fn amenity_ids(&self, place_id: &str) -> StorageResult<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT amenity_id
            FROM place_amenity
            WHERE place_id = $1
            ORDER BY amenity_id
            "#,
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("amenity_id")).collect())
    }

    async fn upsert(&self, entity: &Entity) -> StorageResult<()> {
        match entity {
            Entity::State(state) => {
                sqlx::query(
                    "INSERT INTO states (id, created_at, updated_at, name)
                     VALUES ($1, $2, $3, $4)
                     ON CONFLICT (id) DO UPDATE SET
                     updated_at = EXCLUDED.updated_at,
                     name = EXCLUDED.name",
                )
                .bind(&state.id)
                .bind(state.created_at)
                .bind(state.updated_at)
                .bind(&state.name)
                .execute(&self.pool)
                .await?;
            }
            Entity::City(city) => {
                sqlx::query(
                    "INSERT INTO cities (id, created_at, updated_at, name, state_id)
                     VALUES ($1, $2, $3, $4, $5)
                     ON CONFLICT (id) DO UPDATE SET
                     updated_at = EXCLUDED.updated_at,
                     name = EXCLUDED.name",
                )
                .bind(&city.id)
                .bind(city.created_at)
                .bind(city.updated_at)
                .bind(&city.name)
                .bind(&city.state_id)
                .execute(&self.pool)
                .await?;
            }
            Entity::Amenity(amenity) => {
                sqlx::query(
                    "INSERT INTO amenities (id, created_at, updated_at, name)
                     VALUES ($1, $2, $3, $4)
                     ON CONFLICT (id) DO UPDATE SET
                     updated_at = EXCLUDED.updated_at,
                     name = EXCLUDED.name",
                )
                .bind(&amenity.id)
                .bind(amenity.created_at)
                .bind(amenity.updated_at)
                .bind(&amenity.name)
                .execute(&self.pool)
                .await?;
            }
            Entity::User(user) => {
                sqlx::query(
                    "INSERT INTO users (id, created_at, updated_at, email, password, first_name, last_name)
                     VALUES ($1, $2, $3, $4, $5, $6, $7)
                     ON CONFLICT (id) DO UPDATE SET
                     updated_at = EXCLUDED.updated_at,
                     password = EXCLUDED.password,
                     first_name = EXCLUDED.first_name,
                     last_name = EXCLUDED.last_name",
                )
                .bind(&user.id)
                .bind(user.created_at)
                .bind(user.updated_at)
                .bind(&user.email)
                .bind(&user.password)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .execute(&self.pool)
                .await?;
            }
            Entity::Place(place) => {
                sqlx::query(
                    "INSERT INTO places (id, created_at, updated_at, city_id, user_id, name, description, number_rooms, number_bathrooms, max_guest, price_by_night, latitude, longitude)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                     ON CONFLICT (id) DO UPDATE SET
                     updated_at = EXCLUDED.updated_at,
                     name = EXCLUDED.name,
                     description = EXCLUDED.description,
                     number_rooms = EXCLUDED.number_rooms,
                     number_bathrooms = EXCLUDED.number_bathrooms,
                     max_guest = EXCLUDED.max_guest,
                     price_by_night = EXCLUDED.price_by_night,
                     latitude = EXCLUDED.latitude,
                     longitude = EXCLUDED.longitude",
                )
                .bind(&place.id)
                .bind(place.created_at)
                .bind(place.updated_at)
                .bind(&place.city_id)
                .bind(&place.user_id)
                .bind(&place.name)
                .bind(&place.description)
                .bind(place.number_rooms)
                .bind(place.number_bathrooms)
                .bind(place.max_guest)
                .bind(place.price_by_night)
                .bind(place.latitude)
                .bind(place.longitude)
                .execute(&self.pool)
                .await?;
            }
            Entity::Review(review) => {
                sqlx::query(
                    "INSERT INTO reviews (id, created_at, updated_at, place_id, user_id, text)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     ON CONFLICT (id) DO UPDATE SET
                     updated_at = EXCLUDED.updated_at,
                     text = EXCLUDED.text",
                )
                .bind(&review.id)
                .bind(review.created_at)
                .bind(review.updated_at)
                .bind(&review.place_id)
                .bind(&review.user_id)
                .bind(&review.text)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.collection());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.decode(kind, &row).await?)),
            None => Ok(None),
        }
    }

    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<Vec<Entity>> {
        match kind {
            Some(kind) => self.fetch_kind(kind).await,
            None => {
                let mut entities = Vec::new();
                for kind in EntityKind::ALL {
                    entities.extend(self.fetch_kind(kind).await?);
                }
                Ok(entities)
            }
        }
    }

    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize> {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        let mut total = 0;
        for kind in kinds {
            let sql = format!("SELECT COUNT(*) FROM {}", kind.collection());
            let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
            total += usize::try_from(count).map_err(|_| {
                StorageError::UnexpectedRecord(format!("negative row count for {}", kind))
            })?;
        }
        Ok(total)
    }

    async fn save(&self, mut entity: Entity) -> StorageResult<Entity> {
        entity.touch();
        self.upsert(&entity).await?;

        info!("Saved {}", entity.key());
        match entity {
            Entity::Place(mut place) => {
                place.amenity_ids = self.amenity_ids(&place.id).await?;
                Ok(Entity::Place(place))
            }
            other => Ok(other),
        }
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StorageResult<bool> {
        let mut tx = self.pool.begin().await?;

        let link_column = match kind {
            EntityKind::Place => Some("place_id"),
            EntityKind::Amenity => Some("amenity_id"),
            _ => None,
        };
        if let Some(column) = link_column {
            let sql = format!("DELETE FROM place_amenity WHERE {} = $1", column);
            sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        }

        let sql = format!("DELETE FROM {} WHERE id = $1", kind.collection());
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted {}.{}", kind, id);
        }
        Ok(deleted)
    }

    async fn reload(&self) -> StorageResult<()> {
        // Rows are read on demand; only make sure the database answers.
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        self.pool.close().await;
        info!("Database connection pool closed");
        Ok(())
    }

    async fn add_amenity(&self, place_id: &str, amenity_id: &str) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO place_amenity (place_id, amenity_id)
            VALUES ($1, $2)
            ON CONFLICT (place_id, amenity_id) DO NOTHING
            "#,
        )
        .bind(place_id)
        .bind(amenity_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_amenity(&self, place_id: &str, amenity_id: &str) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM place_amenity
            WHERE place_id = $1 AND amenity_id = $2
            "#,
        )
        .bind(place_id)
        .bind(amenity_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn amenities_of(&self, place_id: &str) -> StorageResult<Vec<Amenity>> {
        let amenities = sqlx::query_as::<_, Amenity>(
            r#"
            SELECT a.id, a.created_at, a.updated_at, a.name
            FROM amenities a
            JOIN place_amenity pa ON pa.amenity_id = a.id
            WHERE pa.place_id = $1
            ORDER BY a.created_at
            "#,
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(amenities)
    }

    async fn cities_of(&self, state_id: &str) -> StorageResult<Vec<City>> {
        let cities = sqlx::query_as::<_, City>(
            "SELECT * FROM cities WHERE state_id = $1 ORDER BY created_at",
        )
        .bind(state_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cities)
    }

    async fn places_of(&self, city_id: &str) -> StorageResult<Vec<Place>> {
        let rows = sqlx::query("SELECT * FROM places WHERE city_id = $1 ORDER BY created_at")
            .bind(city_id)
            .fetch_all(&self.pool)
            .await?;

        let mut places = Vec::with_capacity(rows.len());
        for row in rows {
            let mut place = Place::from_row(&row)?;
            place.amenity_ids = self.amenity_ids(&place.id).await?;
            places.push(place);
        }
        Ok(places)
    }

    async fn reviews_of(&self, place_id: &str) -> StorageResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE place_id = $1 ORDER BY created_at",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
