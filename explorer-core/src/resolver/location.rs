use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{ExplorerError, Result},
    fetch::UpstreamRequest,
    model::{Location, LocationQuery},
    provider::ProviderId,
};

use super::{Endpoint, Resolver, decode};

/// Free text to coordinates, via the geocoding provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationResolver;

#[derive(Debug, Deserialize)]
struct GcLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GcGeometry {
    location: GcLatLng,
}

#[derive(Debug, Deserialize)]
struct GcResult {
    formatted_address: String,
    geometry: GcGeometry,
}

#[derive(Debug, Deserialize)]
struct GcResponse {
    results: Vec<GcResult>,
    #[serde(default)]
    status: Option<String>,
}

impl Resolver for LocationResolver {
    type Query = LocationQuery;
    type Output = Location;

    const PROVIDER: ProviderId = ProviderId::Geocode;

    fn request(&self, endpoint: &Endpoint, query: &LocationQuery) -> Result<UpstreamRequest> {
        let mut url = endpoint.base_url.clone();
        url.query_pairs_mut()
            .append_pair("address", &query.search)
            .append_pair("key", &endpoint.api_key);

        Ok(UpstreamRequest::new(Self::PROVIDER, url))
    }

    fn normalize(&self, query: &LocationQuery, body: Value) -> Result<Location> {
        let parsed: GcResponse = decode(Self::PROVIDER, body)?;

        let Some(first) = parsed.results.into_iter().next() else {
            warn!(status = ?parsed.status, search = %query.search, "Geocoding returned no results");
            return Err(ExplorerError::EmptyResult(Self::PROVIDER));
        };
        debug!(result = ?first, "Geocoding result");

        Ok(Location {
            search_query: query.search.clone(),
            formatted_query: first.formatted_address,
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        })
    }
}
