use std::{convert::TryFrom, fmt};

/// The six upstream APIs the explorer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Geocode,
    Weather,
    Yelp,
    Movies,
    Meetups,
    Trails,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Geocode => "geocode",
            ProviderId::Weather => "weather",
            ProviderId::Yelp => "yelp",
            ProviderId::Movies => "movies",
            ProviderId::Meetups => "meetups",
            ProviderId::Trails => "trails",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::Geocode,
            ProviderId::Weather,
            ProviderId::Yelp,
            ProviderId::Movies,
            ProviderId::Meetups,
            ProviderId::Trails,
        ]
    }

    /// Environment variable holding this provider's API key.
    pub fn env_key(&self) -> &'static str {
        match self {
            ProviderId::Geocode => "GEOCODE_API_KEY",
            ProviderId::Weather => "DARKSKY_API_KEY",
            ProviderId::Yelp => "YELP_API_KEY",
            ProviderId::Movies => "MOVIE_API_KEY",
            ProviderId::Meetups => "MEETUP_API_KEY",
            ProviderId::Trails => "TRAIL_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::Geocode => "https://maps.googleapis.com/maps/api/geocode/json",
            ProviderId::Weather => "https://api.darksky.net/forecast",
            ProviderId::Yelp => "https://api.yelp.com/v3/businesses/search",
            ProviderId::Movies => "https://api.themoviedb.org/3/search/movie",
            ProviderId::Meetups => "https://api.meetup.com/find/upcoming_events",
            ProviderId::Trails => "https://www.hikingproject.com/data/get-trails",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        ProviderId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == lower)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown provider '{value}'. Supported providers: \
                     geocode, weather, yelp, movies, meetups, trails."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let parsed = ProviderId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_parse_is_case_insensitive() {
        assert_eq!(ProviderId::try_from("YELP").unwrap(), ProviderId::Yelp);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn env_keys_are_distinct() {
        let mut keys: Vec<_> = ProviderId::all().iter().map(|id| id.env_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ProviderId::all().len());
    }
}
