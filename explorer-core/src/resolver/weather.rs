use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ExplorerError, Result},
    fetch::UpstreamRequest,
    model::{Coordinates, WeatherDay},
    provider::ProviderId,
};

use super::{Endpoint, Resolver, decode, push_segments};

/// Daily forecast summaries for a coordinate pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherResolver;

/// Day-of-week, month, day, year. Always 15 characters.
const DAY_FORMAT: &str = "%a %b %d %Y";

#[derive(Debug, Deserialize)]
struct DsDay {
    time: i64,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DsDaily {
    data: Vec<DsDay>,
}

#[derive(Debug, Deserialize)]
struct DsResponse {
    daily: DsDaily,
}

impl Resolver for WeatherResolver {
    type Query = Coordinates;
    type Output = Vec<WeatherDay>;

    const PROVIDER: ProviderId = ProviderId::Weather;

    fn request(&self, endpoint: &Endpoint, query: &Coordinates) -> Result<UpstreamRequest> {
        let mut url = endpoint.base_url.clone();
        let position = format!("{},{}", query.latitude, query.longitude);
        push_segments(
            Self::PROVIDER,
            &mut url,
            &[endpoint.api_key.as_str(), position.as_str()],
        )?;

        Ok(UpstreamRequest::new(Self::PROVIDER, url))
    }

    fn normalize(&self, _query: &Coordinates, body: Value) -> Result<Vec<WeatherDay>> {
        let parsed: DsResponse = decode(Self::PROVIDER, body)?;

        parsed
            .daily
            .data
            .into_iter()
            .map(|day| -> Result<WeatherDay> {
                Ok(WeatherDay {
                    forecast: day.summary.unwrap_or_default(),
                    time: format_day(day.time)?,
                })
            })
            .collect()
    }
}

fn format_day(ts: i64) -> Result<String> {
    let when: DateTime<Utc> =
        DateTime::from_timestamp(ts, 0).ok_or_else(|| ExplorerError::BadShape {
            provider: ProviderId::Weather,
            message: format!("timestamp {ts} out of range"),
        })?;

    Ok(when.format(DAY_FORMAT).to_string())
}
