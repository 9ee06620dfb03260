use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ExplorerError, Result},
    fetch::UpstreamRequest,
    model::{Coordinates, Meetup},
    provider::ProviderId,
};

use super::{Endpoint, Resolver, decode};

/// Upcoming events near a coordinate pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeetupResolver;

pub const EVENT_HOST: &str = "https://www.meetup.com";
const PAGE_SIZE: &str = "20";

#[derive(Debug, Deserialize)]
struct MuGroup {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MuEvent {
    link: String,
    name: String,
    /// Epoch milliseconds.
    created: i64,
    group: MuGroup,
}

#[derive(Debug, Deserialize)]
struct MuResponse {
    events: Vec<MuEvent>,
}

impl Resolver for MeetupResolver {
    type Query = Coordinates;
    type Output = Vec<Meetup>;

    const PROVIDER: ProviderId = ProviderId::Meetups;

    fn request(&self, endpoint: &Endpoint, query: &Coordinates) -> Result<UpstreamRequest> {
        let mut url = endpoint.base_url.clone();
        url.query_pairs_mut()
            .append_pair("sign", "true")
            .append_pair("photo-host", "public")
            .append_pair("lat", &query.latitude.to_string())
            .append_pair("lon", &query.longitude.to_string())
            .append_pair("page", PAGE_SIZE)
            .append_pair("key", &endpoint.api_key);

        Ok(UpstreamRequest::new(Self::PROVIDER, url))
    }

    fn normalize(&self, _query: &Coordinates, body: Value) -> Result<Vec<Meetup>> {
        let parsed: MuResponse = decode(Self::PROVIDER, body)?;

        parsed
            .events
            .into_iter()
            .map(|event| -> Result<Meetup> {
                let creation_date = DateTime::from_timestamp_millis(event.created).ok_or_else(
                    || ExplorerError::BadShape {
                        provider: Self::PROVIDER,
                        message: format!("event creation time {} out of range", event.created),
                    },
                )?;

                Ok(Meetup {
                    link: format!("{EVENT_HOST}{}", event.link),
                    name: event.name,
                    creation_date,
                    host: event.group.name,
                })
            })
            .collect()
    }
}
