//! Amenity model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{impl_model, new_id, now};

/// Amenity entity, linked to places many-to-many
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
}

/// New amenity creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NewAmenity {
    pub name: String,
}

/// Amenity update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAmenity {
    pub name: Option<String>,
}

impl Amenity {
    pub fn new(new_amenity: NewAmenity) -> Self {
        let now = now();
        Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
            name: new_amenity.name,
        }
    }

    pub fn apply(&mut self, update: UpdateAmenity) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }
}

impl_model!(Amenity);
