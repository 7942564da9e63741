//! HBnB REST API
//!
//! JSON CRUD endpoints under `/api/v1` for states, cities, amenities, users,
//! places and reviews, backed by whichever [`common::storage::Storage`]
//! the process was started with.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::ApiConfig;
pub use routes::{create_app, create_router};
pub use state::AppState;
