use std::sync::Arc;

use tracing::debug;

use crate::{
    config::Config,
    error::Result,
    fetch::{Fetch, HttpFetcher},
    model::{
        Coordinates, Location, LocationQuery, Meetup, Movie, MovieQuery, Restaurant, Trail,
        WeatherDay,
    },
    resolver::{
        LocationResolver, MeetupResolver, MovieResolver, RestaurantResolver, Resolver,
        TrailResolver, WeatherResolver,
    },
};

/// Runs resolvers against configured providers.
///
/// Holds no per-request state; clone it freely or share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetch>,
}

impl Dispatcher {
    pub fn new(config: Config, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
        }
    }

    /// Dispatcher backed by a real HTTP client with the configured timeout.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout())?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the request, make the one upstream call, normalize the answer.
    pub async fn resolve<R: Resolver>(&self, resolver: &R, query: &R::Query) -> Result<R::Output> {
        let endpoint = self.config.endpoint(R::PROVIDER)?;
        let request = resolver.request(&endpoint, query)?;

        let body = self.fetcher.get_json(&request).await?;
        let output = resolver.normalize(query, body)?;

        debug!(provider = %R::PROVIDER, "Normalized upstream response");
        Ok(output)
    }

    pub async fn location(&self, search: &str) -> Result<Location> {
        let query = LocationQuery {
            search: search.to_string(),
        };
        self.resolve(&LocationResolver, &query).await
    }

    pub async fn weather(&self, at: Coordinates) -> Result<Vec<WeatherDay>> {
        self.resolve(&WeatherResolver, &at).await
    }

    pub async fn restaurants(&self, at: Coordinates) -> Result<Vec<Restaurant>> {
        self.resolve(&RestaurantResolver, &at).await
    }

    pub async fn movies(&self, search_query: &str) -> Result<Vec<Movie>> {
        let query = MovieQuery {
            search_query: search_query.to_string(),
        };
        self.resolve(&MovieResolver, &query).await
    }

    pub async fn meetups(&self, at: Coordinates) -> Result<Vec<Meetup>> {
        self.resolve(&MeetupResolver, &at).await
    }

    pub async fn trails(&self, at: Coordinates) -> Result<Vec<Trail>> {
        self.resolve(&TrailResolver, &at).await
    }
}
