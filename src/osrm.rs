//! OSRM HTTP adapter for point-to-point routes.

use serde::Deserialize;
use tracing::debug;

use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::polyline;
use crate::route::RouteResult;
use crate::traits::RouteClient;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=polyline",
            self.config.base_url, self.config.profile, from.longitude, from.latitude, to.longitude, to.latitude
        )
    }
}

/// OSRM does not geocode, so both descriptors must be coordinate literals.
fn coordinate(descriptor: &str) -> Result<Coordinate, RouteError> {
    Coordinate::parse_descriptor(descriptor)
        .ok_or_else(|| RouteError::Unavailable(format!("OSRM needs \"lat,lng\", got {descriptor:?}")))
}

impl RouteClient for OsrmClient {
    fn fetch_route(&self, origin: &str, destination: &str) -> Result<RouteResult, RouteError> {
        let url = self.route_url(coordinate(origin)?, coordinate(destination)?);
        debug!(%url, "requesting OSRM route");

        // NoRoute comes back with a 4xx status and a JSON body, so read the
        // body before looking at the status.
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response
            .json::<OsrmRouteResponse>()
            .map_err(|err| RouteError::Transport(format!("OSRM {status}: {err}")))?;

        body.into_route()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    #[serde(default)]
    name: String,
}

impl OsrmRouteResponse {
    fn into_route(self) -> Result<RouteResult, RouteError> {
        match self.code.as_str() {
            "Ok" => {}
            "NoRoute" | "NoSegment" => {
                return Err(RouteError::Unavailable(self.message.unwrap_or(self.code)));
            }
            _ => {
                let detail = self.message.unwrap_or_default();
                return Err(RouteError::Transport(format!("{} {}", self.code, detail).trim_end().to_string()));
            }
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RouteError::Unavailable("No route found".to_string()))?;
        let coordinates = polyline::decode(&route.geometry)?;
        if coordinates.is_empty() {
            return Err(RouteError::Unavailable("route has no geometry".to_string()));
        }

        let mut names = self.waypoints.into_iter().map(|waypoint| waypoint.name);
        let start_address = names.next().unwrap_or_default();
        let end_address = names.last().unwrap_or_default();

        Ok(RouteResult {
            coordinates,
            start_address,
            end_address,
            distance_meters: route.distance.max(0.0).round() as u64,
            duration_seconds: route.duration.max(0.0).round() as u64,
        })
    }
}
