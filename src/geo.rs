//! Geographic value types shared by the codec, simulators and adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Renders the `"lat,lng"` location descriptor understood by route providers.
    pub fn to_descriptor(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Parses a `"lat,lng"` literal. Returns `None` for anything else, which
    /// callers treat as a free-text address.
    pub fn parse_descriptor(text: &str) -> Option<Self> {
        let (lat, lng) = text.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lng.trim().parse::<f64>().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Self { latitude, longitude })
    }

    /// Offsets this point by `radius` degrees along `bearing` (radians).
    ///
    /// Degree offsets are treated as locally flat, which is fine at city scale.
    pub fn offset(&self, bearing: f64, radius: f64) -> Self {
        Self {
            latitude: self.latitude + radius * bearing.sin(),
            longitude: self.longitude + radius * bearing.cos(),
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn haversine_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}
