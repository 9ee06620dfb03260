use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::Result,
    fetch::UpstreamRequest,
    model::{Movie, MovieQuery},
    provider::ProviderId,
};

use super::{Endpoint, Resolver, decode};

#[derive(Debug, Clone, Copy, Default)]
pub struct MovieResolver;

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Deserialize)]
struct TmMovie {
    title: String,
    #[serde(default)]
    overview: Option<String>,
    vote_average: f64,
    vote_count: u64,
    #[serde(default)]
    poster_path: Option<String>,
    popularity: f64,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmResponse {
    results: Vec<TmMovie>,
}

impl Resolver for MovieResolver {
    type Query = MovieQuery;
    type Output = Vec<Movie>;

    const PROVIDER: ProviderId = ProviderId::Movies;

    fn request(&self, endpoint: &Endpoint, query: &MovieQuery) -> Result<UpstreamRequest> {
        let mut url = endpoint.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &endpoint.api_key)
            .append_pair("query", &query.search_query);

        Ok(UpstreamRequest::new(Self::PROVIDER, url))
    }

    fn normalize(&self, _query: &MovieQuery, body: Value) -> Result<Vec<Movie>> {
        let parsed: TmResponse = decode(Self::PROVIDER, body)?;

        Ok(parsed
            .results
            .into_iter()
            .map(|m| Movie {
                title: m.title,
                overview: m.overview.unwrap_or_default(),
                average_votes: m.vote_average,
                total_votes: m.vote_count,
                image_url: format!("{POSTER_BASE_URL}{}", m.poster_path.unwrap_or_default()),
                popularity: m.popularity,
                release_date: m.release_date.unwrap_or_default(),
            })
            .collect())
    }
}
