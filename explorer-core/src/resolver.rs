use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{ExplorerError, Result},
    fetch::UpstreamRequest,
    provider::ProviderId,
};

pub mod location;
pub mod meetups;
pub mod movies;
pub mod restaurants;
pub mod trails;
pub mod weather;

pub use location::LocationResolver;
pub use meetups::MeetupResolver;
pub use movies::MovieResolver;
pub use restaurants::RestaurantResolver;
pub use trails::TrailResolver;
pub use weather::WeatherResolver;

/// A provider's base URL plus the key used to call it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base_url: Url,
    pub api_key: String,
}

/// Translation between one query and one provider call.
///
/// `request` builds the outbound URL, `normalize` maps the provider's JSON
/// into our records. Everything in between (key lookup, the HTTP call, error
/// classification) lives in [`crate::Dispatcher::resolve`].
pub trait Resolver: Send + Sync {
    type Query: Send + Sync;
    type Output: Serialize + Send;

    const PROVIDER: ProviderId;

    fn request(&self, endpoint: &Endpoint, query: &Self::Query) -> Result<UpstreamRequest>;

    fn normalize(&self, query: &Self::Query, body: Value) -> Result<Self::Output>;
}

/// Deserialize a provider payload, reporting mismatches as `BadShape`.
pub(crate) fn decode<T: DeserializeOwned>(provider: ProviderId, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| ExplorerError::BadShape {
        provider,
        message: e.to_string(),
    })
}

/// Append percent-encoded path segments to `url`.
pub(crate) fn push_segments(provider: ProviderId, url: &mut Url, segments: &[&str]) -> Result<()> {
    if url.cannot_be_a_base() {
        return Err(ExplorerError::InvalidUrl {
            provider,
            message: format!("'{url}' cannot take path segments"),
        });
    }

    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    Ok(())
}
