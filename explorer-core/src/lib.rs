//! Core library for the city explorer API.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The six upstream providers and how each response is normalized
//! - Shared records returned to clients
//!
//! It is used by `explorer-cli`, which serves the records over HTTP.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod resolver;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{Config, ProviderConfig, ServerConfig};
pub use dispatch::Dispatcher;
pub use error::{ExplorerError, Result};
pub use fetch::{Fetch, HttpFetcher, UpstreamRequest};
pub use model::{
    Coordinates, Location, LocationQuery, Meetup, Movie, MovieQuery, Restaurant, Trail, WeatherDay,
};
pub use provider::ProviderId;
pub use resolver::{Endpoint, Resolver};
