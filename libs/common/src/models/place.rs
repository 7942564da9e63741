//! Place model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{impl_model, new_id, now};

/// Place entity, belongs to a city and a user
///
/// `amenity_ids` mirrors the Place–Amenity association. The file backend
/// stores the links here; the relational backend fills it from the
/// `place_amenity` table on read. Use the storage association operations to
/// change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Place {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub city_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub number_rooms: i32,
    #[serde(default)]
    pub number_bathrooms: i32,
    #[serde(default)]
    pub max_guest: i32,
    #[serde(default)]
    pub price_by_night: i32,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    #[sqlx(skip)]
    pub amenity_ids: Vec<String>,
}

/// New place creation payload; `city_id` comes from the request path
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NewPlace {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub number_rooms: i32,
    pub number_bathrooms: i32,
    pub max_guest: i32,
    pub price_by_night: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Place update payload. `city_id` and `user_id` are fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePlace {
    pub name: Option<String>,
    pub description: Option<String>,
    pub number_rooms: Option<i32>,
    pub number_bathrooms: Option<i32>,
    pub max_guest: Option<i32>,
    pub price_by_night: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Place {
    pub fn new(city_id: &str, new_place: NewPlace) -> Self {
        let now = now();
        Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
            city_id: city_id.to_string(),
            user_id: new_place.user_id,
            name: new_place.name,
            description: new_place.description,
            number_rooms: new_place.number_rooms,
            number_bathrooms: new_place.number_bathrooms,
            max_guest: new_place.max_guest,
            price_by_night: new_place.price_by_night,
            latitude: new_place.latitude,
            longitude: new_place.longitude,
            amenity_ids: Vec::new(),
        }
    }

    pub fn apply(&mut self, update: UpdatePlace) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(number_rooms) = update.number_rooms {
            self.number_rooms = number_rooms;
        }
        if let Some(number_bathrooms) = update.number_bathrooms {
            self.number_bathrooms = number_bathrooms;
        }
        if let Some(max_guest) = update.max_guest {
            self.max_guest = max_guest;
        }
        if let Some(price_by_night) = update.price_by_night {
            self.price_by_night = price_by_night;
        }
        if let Some(latitude) = update.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = update.longitude {
            self.longitude = longitude;
        }
    }

    /// Whether the amenity is linked to this place
    pub fn has_amenity(&self, amenity_id: &str) -> bool {
        self.amenity_ids.iter().any(|id| id == amenity_id)
    }
}

impl_model!(Place);
