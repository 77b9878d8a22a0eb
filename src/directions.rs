//! Google Directions HTTP adapter.

use serde::Deserialize;
use tracing::debug;

use crate::error::RouteError;
use crate::polyline;
use crate::route::RouteResult;
use crate::traits::RouteClient;

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub mode: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            api_key: String::new(),
            mode: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteClient for DirectionsClient {
    fn fetch_route(&self, origin: &str, destination: &str) -> Result<RouteResult, RouteError> {
        debug!(origin, destination, "requesting directions");

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", self.config.mode.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<DirectionsResponse>())?;

        body.into_route()
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u64,
}

impl DirectionsResponse {
    fn into_route(self) -> Result<RouteResult, RouteError> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => {
                return Err(RouteError::Unavailable(self.status));
            }
            _ => {
                let detail = self.error_message.unwrap_or_default();
                return Err(RouteError::Transport(format!("{} {}", self.status, detail).trim_end().to_string()));
            }
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RouteError::Unavailable("No route found".to_string()))?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| RouteError::Unavailable("route has no legs".to_string()))?;

        let coordinates = polyline::decode(&route.overview_polyline.points)?;
        if coordinates.is_empty() {
            return Err(RouteError::Unavailable("route has no geometry".to_string()));
        }

        Ok(RouteResult {
            coordinates,
            start_address: leg.start_address,
            end_address: leg.end_address,
            distance_meters: leg.distance.map_or(0, |d| d.value),
            duration_seconds: leg.duration.map_or(0, |d| d.value),
        })
    }
}
