//! Core library for the `citymap` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The user/city association store and catalog queries over SQLite
//! - Coordinate helpers (distance, local time) and the weather provider
//!   abstraction consumed by presentation code
//!
//! The `cities` catalog table is provisioned externally; only the
//! `users_cities` link table is created here.

pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod model;
pub mod provider;
pub mod query;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{Config, Units};
pub use db::Database;
pub use error::{CityError, Result};
pub use model::{City, CityWeather, Coordinates, DensityRange, MapPoint};
pub use provider::{WeatherProvider, provider_from_config};
pub use query::QueryEngine;
pub use service::CityMap;
pub use store::AssociationStore;
