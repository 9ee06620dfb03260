use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::Result,
    fetch::UpstreamRequest,
    model::{Coordinates, Restaurant},
    provider::ProviderId,
};

use super::{Endpoint, Resolver, decode};

/// Nearby restaurants from the business-search provider.
///
/// This is the one provider that authenticates with a bearer token instead
/// of a key in the URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestaurantResolver;

const SEARCH_TERM: &str = "restaurants";

#[derive(Debug, Deserialize)]
struct YpBusiness {
    name: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    price: Option<String>,
    rating: f64,
    url: String,
}

#[derive(Debug, Deserialize)]
struct YpResponse {
    businesses: Vec<YpBusiness>,
}

impl Resolver for RestaurantResolver {
    type Query = Coordinates;
    type Output = Vec<Restaurant>;

    const PROVIDER: ProviderId = ProviderId::Yelp;

    fn request(&self, endpoint: &Endpoint, query: &Coordinates) -> Result<UpstreamRequest> {
        let mut url = endpoint.base_url.clone();
        url.query_pairs_mut()
            .append_pair("term", SEARCH_TERM)
            .append_pair("latitude", &query.latitude.to_string())
            .append_pair("longitude", &query.longitude.to_string());

        Ok(UpstreamRequest::new(Self::PROVIDER, url).with_bearer(endpoint.api_key.as_str()))
    }

    fn normalize(&self, _query: &Coordinates, body: Value) -> Result<Vec<Restaurant>> {
        let parsed: YpResponse = decode(Self::PROVIDER, body)?;

        Ok(parsed
            .businesses
            .into_iter()
            .map(|b| Restaurant {
                name: b.name,
                image_url: b.image_url,
                price: b.price,
                rating: b.rating,
                url: b.url,
            })
            .collect())
    }
}
