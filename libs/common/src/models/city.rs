//! City model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{impl_model, new_id, now};

/// City entity, belongs to a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state_id: String,
}

/// New city creation payload; `state_id` comes from the request path
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NewCity {
    pub name: String,
}

/// City update payload. `state_id` is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCity {
    pub name: Option<String>,
}

impl City {
    pub fn new(state_id: &str, new_city: NewCity) -> Self {
        let now = now();
        Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
            name: new_city.name,
            state_id: state_id.to_string(),
        }
    }

    pub fn apply(&mut self, update: UpdateCity) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }
}

impl_model!(City);
