//! Route values returned by a [`RouteClient`](crate::traits::RouteClient).

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Whole-route totals as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTotals {
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

impl RouteTotals {
    pub const ZERO: RouteTotals = RouteTotals {
        distance_meters: 0,
        duration_seconds: 0,
    };

    pub fn new(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }
}

/// A resolved route between two locations.
///
/// Providers always return at least one coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub coordinates: Vec<Coordinate>,
    pub start_address: String,
    pub end_address: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

impl RouteResult {
    pub fn totals(&self) -> RouteTotals {
        RouteTotals::new(self.distance_meters, self.duration_seconds)
    }

    /// First coordinate of the route (the pickup pin).
    pub fn start(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    /// Last coordinate of the route (the dropoff pin).
    pub fn end(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_totals() {
        let route = RouteResult {
            coordinates: vec![Coordinate::new(1.0, 2.0), Coordinate::new(1.5, 2.5), Coordinate::new(3.0, 4.0)],
            start_address: "A".to_string(),
            end_address: "B".to_string(),
            distance_meters: 1200,
            duration_seconds: 180,
        };
        assert_eq!(route.start(), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(route.end(), Some(Coordinate::new(3.0, 4.0)));
        assert_eq!(route.totals(), RouteTotals::new(1200, 180));
    }
}
