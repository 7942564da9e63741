//! User model and password hashing

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, EntityKind, Model, new_id, now};
use crate::error::{StorageError, StorageResult};

/// User entity
///
/// `password` holds an Argon2 PHC string, never the plain text. It is
/// persisted by the storage backends but left out of [`Model::to_dict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// New user creation payload, with the password in plain text
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// User update payload. The email is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Create a user, hashing the supplied password
    pub fn new(new_user: NewUser) -> StorageResult<Self> {
        let now = now();
        Ok(Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
            email: new_user.email,
            password: hash_password(&new_user.password)?,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
        })
    }

    pub fn apply(&mut self, update: UpdateUser) -> StorageResult<()> {
        if let Some(password) = update.password {
            self.password = hash_password(&password)?;
        }
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        Ok(())
    }

    /// Check a plain-text password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password) {
            Ok(parsed_hash) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(_) => false,
        }
    }
}

fn hash_password(password: &str) -> StorageResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StorageError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(password_hash)
}

impl Model for User {
    const KIND: EntityKind = EntityKind::User;
    const PRIVATE_FIELDS: &'static [&'static str] = &["password"];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn into_entity(self) -> Entity {
        Entity::User(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::User(user) => Some(user),
            _ => None,
        }
    }
}
