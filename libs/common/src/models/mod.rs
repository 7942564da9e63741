//! Entity model shared by the storage engine and the API service
//!
//! Every persisted record carries an opaque string id and creation/update
//! timestamps. Relationships are plain foreign-key fields; collection
//! accessors (a State's cities, a Place's reviews) live on the storage engine.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fmt;

pub mod amenity;
pub mod city;
pub mod place;
pub mod review;
pub mod state;
pub mod user;

// Re-export for convenience
pub use amenity::{Amenity, NewAmenity, UpdateAmenity};
pub use city::{City, NewCity, UpdateCity};
pub use place::{NewPlace, Place, UpdatePlace};
pub use review::{NewReview, Review, UpdateReview};
pub use state::{NewState, State, UpdateState};
pub use user::{NewUser, UpdateUser, User};

/// Key carrying the type discriminator in serialized records
pub const CLASS_KEY: &str = "__class__";

/// The kinds of entity known to the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Amenity,
    City,
    Place,
    Review,
    State,
    User,
}

impl EntityKind {
    /// All kinds, in the order used by `/stats`
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Amenity,
        EntityKind::City,
        EntityKind::Place,
        EntityKind::Review,
        EntityKind::State,
        EntityKind::User,
    ];

    /// Class name used as the record discriminator
    pub fn class_name(self) -> &'static str {
        match self {
            EntityKind::Amenity => "Amenity",
            EntityKind::City => "City",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
            EntityKind::State => "State",
            EntityKind::User => "User",
        }
    }

    /// Plural collection name, also the relational table name
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Amenity => "amenities",
            EntityKind::City => "cities",
            EntityKind::Place => "places",
            EntityKind::Review => "reviews",
            EntityKind::State => "states",
            EntityKind::User => "users",
        }
    }

    /// Parse a class name such as `"Place"`
    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.class_name() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Any stored entity, tagged with its class name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Amenity(Amenity),
    City(City),
    Place(Place),
    Review(Review),
    State(State),
    User(User),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Amenity(_) => EntityKind::Amenity,
            Entity::City(_) => EntityKind::City,
            Entity::Place(_) => EntityKind::Place,
            Entity::Review(_) => EntityKind::Review,
            Entity::State(_) => EntityKind::State,
            Entity::User(_) => EntityKind::User,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Amenity(m) => m.id(),
            Entity::City(m) => m.id(),
            Entity::Place(m) => m.id(),
            Entity::Review(m) => m.id(),
            Entity::State(m) => m.id(),
            Entity::User(m) => m.id(),
        }
    }

    /// Storage key in the form `<Class>.<id>`
    pub fn key(&self) -> String {
        storage_key(self.kind(), self.id())
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        let now = now();
        match self {
            Entity::Amenity(m) => m.updated_at = now,
            Entity::City(m) => m.updated_at = now,
            Entity::Place(m) => m.updated_at = now,
            Entity::Review(m) => m.updated_at = now,
            Entity::State(m) => m.updated_at = now,
            Entity::User(m) => m.updated_at = now,
        }
    }

    /// Public representation, see [`Model::to_dict`]
    pub fn to_dict(&self) -> Value {
        match self {
            Entity::Amenity(m) => m.to_dict(),
            Entity::City(m) => m.to_dict(),
            Entity::Place(m) => m.to_dict(),
            Entity::Review(m) => m.to_dict(),
            Entity::State(m) => m.to_dict(),
            Entity::User(m) => m.to_dict(),
        }
    }
}

/// Build the `<Class>.<id>` key used by the file backend
pub fn storage_key(kind: EntityKind, id: &str) -> String {
    format!("{}.{}", kind.class_name(), id)
}

/// Current time at microsecond precision, the resolution PostgreSQL keeps
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Generate a fresh entity id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Common behaviour of the six entity types
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind this type is stored as
    const KIND: EntityKind;

    /// Fields never exposed by [`Model::to_dict`]
    const PRIVATE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    fn into_entity(self) -> Entity;
    fn from_entity(entity: Entity) -> Option<Self>;

    /// Flat key/value form: every public field plus the `__class__` discriminator
    fn to_dict(&self) -> Value {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for field in Self::PRIVATE_FIELDS {
            map.remove(*field);
        }
        map.insert(
            CLASS_KEY.to_string(),
            Value::String(Self::KIND.class_name().to_string()),
        );
        Value::Object(map)
    }
}

macro_rules! impl_model {
    ($ty:ident) => {
        impl $crate::models::Model for $ty {
            const KIND: $crate::models::EntityKind = $crate::models::EntityKind::$ty;

            fn id(&self) -> &str {
                &self.id
            }

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.updated_at
            }

            fn into_entity(self) -> $crate::models::Entity {
                $crate::models::Entity::$ty(self)
            }

            fn from_entity(entity: $crate::models::Entity) -> Option<Self> {
                match entity {
                    $crate::models::Entity::$ty(model) => Some(model),
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use impl_model;
