//! Review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{impl_model, new_id, now};

/// Review entity, written by a user about a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

/// New review creation payload; `place_id` comes from the request path
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NewReview {
    pub user_id: String,
    pub text: String,
}

/// Review update payload. Only the text may change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
}

impl Review {
    pub fn new(place_id: &str, new_review: NewReview) -> Self {
        let now = now();
        Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
            place_id: place_id.to_string(),
            user_id: new_review.user_id,
            text: new_review.text,
        }
    }

    pub fn apply(&mut self, update: UpdateReview) {
        if let Some(text) = update.text {
            self.text = text;
        }
    }
}

impl_model!(Review);
