//! Common library for the HBnB application
//!
//! This crate provides the entity model (states, cities, amenities, places,
//! reviews and users), the storage engine with its file and PostgreSQL
//! backends, and the database connectivity shared by the services.
//!
//! ```rust,no_run
//! use common::models::{NewState, State};
//! use common::storage::{StorageConfig, connect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = connect(&StorageConfig::from_env()).await?;
//!     let state = storage.persist(State::new(NewState { name: "Texas".into() })).await?;
//!     println!("Stored state {}", state.id);
//!     storage.close().await?;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod models;
pub mod storage;
