//! State model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{impl_model, new_id, now};

/// State entity; owns its cities through `City::state_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct State {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
}

/// New state creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NewState {
    pub name: String,
}

/// State update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateState {
    pub name: Option<String>,
}

impl State {
    pub fn new(new_state: NewState) -> Self {
        let now = now();
        Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
            name: new_state.name,
        }
    }

    pub fn apply(&mut self, update: UpdateState) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }
}

impl_model!(State);
