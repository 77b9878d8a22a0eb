//! Straight-line route client (fallback when no provider is reachable).
//!
//! Interpolates a direct path between two coordinate literals and estimates
//! travel time from great-circle distance and an assumed speed. Ignores roads
//! entirely, but never fails on coordinates.

use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::route::RouteResult;
use crate::traits::RouteClient;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Segments per generated path.
const DEFAULT_SEGMENTS: usize = 8;

#[derive(Debug, Clone)]
pub struct StraightLineClient {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// The path has `segments + 1` coordinates.
    pub segments: usize,
}

impl Default for StraightLineClient {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl StraightLineClient {
    pub fn new(speed_kmh: f64, segments: usize) -> Self {
        Self { speed_kmh, segments }
    }

    fn meters_to_seconds(&self, meters: f64) -> u64 {
        if self.speed_kmh <= 0.0 {
            return 0;
        }
        let hours = meters / 1000.0 / self.speed_kmh;
        (hours * 3600.0).round() as u64
    }

    fn interpolate(&self, from: Coordinate, to: Coordinate) -> Vec<Coordinate> {
        let segments = self.segments.max(1);
        (0..=segments)
            .map(|i| {
                if i == segments {
                    return to;
                }
                let t = i as f64 / segments as f64;
                Coordinate::new(
                    from.latitude + (to.latitude - from.latitude) * t,
                    from.longitude + (to.longitude - from.longitude) * t,
                )
            })
            .collect()
    }
}

impl RouteClient for StraightLineClient {
    fn fetch_route(&self, origin: &str, destination: &str) -> Result<RouteResult, RouteError> {
        let from = Coordinate::parse_descriptor(origin)
            .ok_or_else(|| RouteError::Unavailable(format!("cannot place {origin:?}")))?;
        let to = Coordinate::parse_descriptor(destination)
            .ok_or_else(|| RouteError::Unavailable(format!("cannot place {destination:?}")))?;

        let meters = from.haversine_meters(&to);
        Ok(RouteResult {
            coordinates: self.interpolate(from, to),
            start_address: origin.to_string(),
            end_address: destination.to_string(),
            distance_meters: meters.round() as u64,
            duration_seconds: self.meters_to_seconds(meters),
        })
    }
}
