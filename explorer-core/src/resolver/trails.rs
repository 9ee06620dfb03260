use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ExplorerError, Result},
    fetch::UpstreamRequest,
    model::{Coordinates, Trail},
    provider::ProviderId,
};

use super::{Endpoint, Resolver, decode, push_segments};

/// Hiking trails within a fixed radius of a coordinate pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailResolver;

pub const TRAIL_PAGE_BASE: &str = "https://www.hikingproject.com/trail";
/// In the provider's own unit (miles).
const MAX_DISTANCE: &str = "10";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HpTrail {
    id: u64,
    name: String,
    location: String,
    length: f64,
    stars: f64,
    star_votes: u64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    condition_status: String,
    /// `"YYYY-MM-DD HH:MM:SS"`
    #[serde(default)]
    condition_date: String,
}

#[derive(Debug, Deserialize)]
struct HpResponse {
    trails: Vec<HpTrail>,
}

impl Resolver for TrailResolver {
    type Query = Coordinates;
    type Output = Vec<Trail>;

    const PROVIDER: ProviderId = ProviderId::Trails;

    fn request(&self, endpoint: &Endpoint, query: &Coordinates) -> Result<UpstreamRequest> {
        let mut url = endpoint.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &query.latitude.to_string())
            .append_pair("lon", &query.longitude.to_string())
            .append_pair("maxDistance", MAX_DISTANCE)
            .append_pair("key", &endpoint.api_key);

        Ok(UpstreamRequest::new(Self::PROVIDER, url))
    }

    fn normalize(&self, _query: &Coordinates, body: Value) -> Result<Vec<Trail>> {
        let parsed: HpResponse = decode(Self::PROVIDER, body)?;

        parsed
            .trails
            .into_iter()
            .map(|t| -> Result<Trail> {
                let trail_url = trail_page(t.id, &t.name)?;
                let (date, time) = t
                    .condition_date
                    .split_once(' ')
                    .unwrap_or((t.condition_date.as_str(), ""));

                Ok(Trail {
                    trail_url,
                    conditions_date: date.to_string(),
                    condition_time: time.to_string(),
                    name: t.name,
                    location: t.location,
                    length: t.length,
                    stars: t.stars,
                    star_votes: t.star_votes,
                    summary: t.summary,
                    conditions: t.condition_status,
                })
            })
            .collect()
    }
}

/// `<base>/<id>/<name>`, with the name escaped as a path segment.
fn trail_page(id: u64, name: &str) -> Result<String> {
    let mut url = Url::parse(TRAIL_PAGE_BASE).map_err(|e| ExplorerError::InvalidUrl {
        provider: ProviderId::Trails,
        message: e.to_string(),
    })?;
    let id = id.to_string();
    push_segments(ProviderId::Trails, &mut url, &[id.as_str(), name])?;
    Ok(url.into())
}
