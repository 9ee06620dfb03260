//! HTTP surface of the explorer.
//!
//! Every route takes its input from query parameters nested under `data`,
//! makes one upstream call through the [`Dispatcher`] and returns JSON.
//! Failures of any kind become a 500 with a fixed body; the details go to
//! the log only.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use explorer_core::{
    Config, Coordinates, Dispatcher, ExplorerError, Location, Meetup, Movie, Restaurant, Trail,
    WeatherDay,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

pub const FAILURE_BODY: &str = "Sorry, something broke";

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// Start the web server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config)?;
    let config = dispatcher.config();

    for id in config.unconfigured_providers() {
        warn!(provider = %id, env = id.env_key(), "No API key configured; its route will fail");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { dispatcher };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("App is up on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/location", get(location))
        .route("/weather", get(weather))
        .route("/yelp", get(yelp))
        .route("/movies", get(movies))
        .route("/meetups", get(meetups))
        .route("/trails", get(trails))
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Path only: query strings carry user searches.
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

// --- Query structs ---

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    #[serde(default)]
    data: String,
}

/// The client sends its whole location object; only the coordinates matter.
#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    #[serde(rename = "data[latitude]")]
    latitude: f64,
    #[serde(rename = "data[longitude]")]
    longitude: f64,
}

impl From<CoordinateParams> for Coordinates {
    fn from(params: CoordinateParams) -> Self {
        Coordinates {
            latitude: params.latitude,
            longitude: params.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieParams {
    #[serde(rename = "data[search_query]", default)]
    search_query: String,
}

// --- Errors ---

pub struct ApiError(ExplorerError);

impl From<ExplorerError> for ApiError {
    fn from(err: ExplorerError) -> Self {
        ApiError(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(ExplorerError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        error!(
            kind = err.kind(),
            provider = err.provider().map(|p| p.as_str()).unwrap_or("-"),
            error = %err,
            "Request failed"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_BODY).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// --- Handlers ---

async fn location(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> ApiResult<Location> {
    let Query(params) = params?;
    Ok(Json(state.dispatcher.location(&params.data).await?))
}

async fn weather(
    State(state): State<AppState>,
    params: Result<Query<CoordinateParams>, QueryRejection>,
) -> ApiResult<Vec<WeatherDay>> {
    let Query(params) = params?;
    Ok(Json(state.dispatcher.weather(params.into()).await?))
}

async fn yelp(
    State(state): State<AppState>,
    params: Result<Query<CoordinateParams>, QueryRejection>,
) -> ApiResult<Vec<Restaurant>> {
    let Query(params) = params?;
    Ok(Json(state.dispatcher.restaurants(params.into()).await?))
}

async fn movies(
    State(state): State<AppState>,
    params: Result<Query<MovieParams>, QueryRejection>,
) -> ApiResult<Vec<Movie>> {
    let Query(params) = params?;
    Ok(Json(state.dispatcher.movies(&params.search_query).await?))
}

async fn meetups(
    State(state): State<AppState>,
    params: Result<Query<CoordinateParams>, QueryRejection>,
) -> ApiResult<Vec<Meetup>> {
    let Query(params) = params?;
    Ok(Json(state.dispatcher.meetups(params.into()).await?))
}

async fn trails(
    State(state): State<AppState>,
    params: Result<Query<CoordinateParams>, QueryRejection>,
) -> ApiResult<Vec<Trail>> {
    let Query(params) = params?;
    Ok(Json(state.dispatcher.trails(params.into()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use explorer_core::{ProviderId, testing::StaticFetcher};
    use serde_json::{Value, json};
    use std::{net::SocketAddr, sync::Arc};
    use tower::ServiceExt;

    fn configured() -> Config {
        let mut cfg = Config::default();
        for id in ProviderId::all() {
            cfg.upsert_provider_api_key(*id, format!("{id}-key"));
        }
        cfg
    }

    fn setup_test_app(fetcher: StaticFetcher) -> Router {
        let dispatcher = Dispatcher::new(configured(), Arc::new(fetcher));
        create_router(AppState { dispatcher })
    }

    async fn get_raw(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get_raw(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn assert_generic_failure(status: StatusCode, body: &[u8]) {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, FAILURE_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_raw(setup_test_app(StaticFetcher::new()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_location_seattle() {
        let app = setup_test_app(StaticFetcher::new().with_json(
            ProviderId::Geocode,
            json!({
                "results": [{
                    "formatted_address": "Seattle, WA, USA",
                    "geometry": { "location": { "lat": 47.6, "lng": -122.3 } }
                }],
                "status": "OK"
            }),
        ));

        let (status, json) = get_json(app, "/location?data=Seattle").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "search_query": "Seattle",
                "formatted_query": "Seattle, WA, USA",
                "latitude": 47.6,
                "longitude": -122.3
            })
        );
    }

    #[tokio::test]
    async fn test_location_with_no_results_fails() {
        let app = setup_test_app(
            StaticFetcher::new()
                .with_json(ProviderId::Geocode, json!({ "results": [], "status": "ZERO_RESULTS" })),
        );

        let (status, body) = get_raw(app, "/location?data=zzzz").await;
        assert_generic_failure(status, &body);
    }

    #[tokio::test]
    async fn test_yelp_empty_is_success() {
        let app = setup_test_app(
            StaticFetcher::new().with_json(ProviderId::Yelp, json!({ "businesses": [], "total": 0 })),
        );

        let (status, json) =
            get_json(app, "/yelp?data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn test_weather_upstream_failure() {
        let app = setup_test_app(
            StaticFetcher::new().with_unreachable(ProviderId::Weather, "request timed out"),
        );

        let (status, body) =
            get_raw(app, "/weather?data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3").await;
        assert_generic_failure(status, &body);
    }

    #[tokio::test]
    async fn test_weather_days() {
        let app = setup_test_app(StaticFetcher::new().with_json(
            ProviderId::Weather,
            json!({
                "daily": { "data": [
                    { "time": 1_705_305_600, "summary": "Rain." },
                    { "time": 1_705_392_000, "summary": "Clear." }
                ]}
            }),
        ));

        let (status, json) =
            get_json(app, "/weather?data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                { "forecast": "Rain.", "time": "Mon Jan 15 2024" },
                { "forecast": "Clear.", "time": "Tue Jan 16 2024" }
            ])
        );
    }

    #[tokio::test]
    async fn test_coordinates_ignore_extra_location_fields() {
        let fetcher = Arc::new(
            StaticFetcher::new().with_json(ProviderId::Trails, json!({ "trails": [] })),
        );
        let app = create_router(AppState {
            dispatcher: Dispatcher::new(configured(), fetcher.clone()),
        });

        let uri = "/trails?data%5Bsearch_query%5D=seattle\
                   &data%5Bformatted_query%5D=Seattle%2C%20WA\
                   &data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3";
        let (status, json) = get_json(app, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));

        let url = fetcher.requests()[0].url.clone();
        assert!(url.as_str().contains("lat=47.6&lon=-122.3&maxDistance=10"));
    }

    #[tokio::test]
    async fn test_missing_coordinates_is_generic_failure() {
        let fetcher = Arc::new(StaticFetcher::new());
        let app = create_router(AppState {
            dispatcher: Dispatcher::new(configured(), fetcher.clone()),
        });

        let (status, body) = get_raw(app, "/meetups?data%5Blatitude%5D=47.6").await;

        assert_generic_failure(status, &body);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_coordinates_is_generic_failure() {
        let app = setup_test_app(StaticFetcher::new());
        let (status, body) =
            get_raw(app, "/yelp?data%5Blatitude%5D=north&data%5Blongitude%5D=-122.3").await;
        assert_generic_failure(status, &body);
    }

    #[tokio::test]
    async fn test_movies_poster_url() {
        let app = setup_test_app(StaticFetcher::new().with_json(
            ProviderId::Movies,
            json!({
                "results": [{
                    "title": "Sleepless in Seattle",
                    "overview": "Radio romance.",
                    "vote_average": 6.6,
                    "vote_count": 1811,
                    "poster_path": "/abc.jpg",
                    "popularity": 11.3,
                    "release_date": "1993-06-24"
                }]
            }),
        ));

        let (status, json) = get_json(app, "/movies?data%5Bsearch_query%5D=seattle").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["image_url"], "https://image.tmdb.org/t/p/w500/abc.jpg");
        assert_eq!(json[0]["average_votes"], 6.6);
        assert_eq!(json[0]["total_votes"], 1811);
    }

    #[tokio::test]
    async fn test_meetups_link_and_host() {
        let app = setup_test_app(StaticFetcher::new().with_json(
            ProviderId::Meetups,
            json!({
                "events": [{
                    "name": "Rust Night",
                    "created": 1_700_000_000_000_i64,
                    "link": "/seattle-rust/events/1/",
                    "group": { "name": "Seattle Rust" }
                }]
            }),
        ));

        let (status, json) =
            get_json(app, "/meetups?data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["link"], "https://www.meetup.com/seattle-rust/events/1/");
        assert_eq!(json[0]["host"], "Seattle Rust");
        assert_eq!(json[0]["creation_date"], "2023-11-14T22:13:20Z");
    }

    #[tokio::test]
    async fn test_upstream_bad_status_hides_details() {
        let app = setup_test_app(StaticFetcher::new().with_status(
            ProviderId::Trails,
            403,
            "invalid key TRAILS-SECRET",
        ));

        let (status, body) =
            get_raw(app, "/trails?data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3").await;

        assert_generic_failure(status, &body);
        assert!(!String::from_utf8_lossy(&body).contains("TRAILS-SECRET"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_generic_failure() {
        let dispatcher = Dispatcher::new(Config::default(), Arc::new(StaticFetcher::new()));
        let app = create_router(AppState { dispatcher });

        let (status, body) = get_raw(app, "/movies?data%5Bsearch_query%5D=x").await;
        assert_generic_failure(status, &body);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = setup_test_app(StaticFetcher::new());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    async fn spawn_upstream(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_location_through_real_http_client() {
        let upstream = Router::new().route(
            "/geocode/json",
            get(|| async {
                Json(json!({
                    "results": [{
                        "formatted_address": "Seattle, WA, USA",
                        "geometry": { "location": { "lat": 47.6, "lng": -122.3 } }
                    }]
                }))
            }),
        );
        let addr = spawn_upstream(upstream).await;

        let mut cfg = configured();
        cfg.set_provider_base_url(ProviderId::Geocode, format!("http://{addr}/geocode/json"));
        let app = create_router(AppState {
            dispatcher: Dispatcher::from_config(cfg).unwrap(),
        });

        let (status, json) = get_json(app, "/location?data=Seattle").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["formatted_query"], "Seattle, WA, USA");
    }

    #[tokio::test]
    async fn test_upstream_server_error_through_real_http_client() {
        let upstream = Router::new().route(
            "/forecast/:key/:position",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let addr = spawn_upstream(upstream).await;

        let mut cfg = configured();
        cfg.set_provider_base_url(ProviderId::Weather, format!("http://{addr}/forecast"));
        let app = create_router(AppState {
            dispatcher: Dispatcher::from_config(cfg).unwrap(),
        });

        let (status, body) =
            get_raw(app, "/weather?data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3").await;
        assert_generic_failure(status, &body);
    }
}
