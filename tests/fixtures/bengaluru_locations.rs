//! Real Bengaluru locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use ride_sim::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn descriptor(&self) -> String {
        self.coordinate().to_descriptor()
    }
}

/// Default map center used by the booking screen.
pub const CITY_CENTER: Location = Location::new("Bengaluru", 12.9716, 77.5946);

pub const PICKUPS: &[Location] = &[
    Location::new("MG Road Metro", 12.9755, 77.6066),
    Location::new("Cubbon Park", 12.9763, 77.5929),
    Location::new("Indiranagar 100ft Road", 12.9719, 77.6412),
    Location::new("Koramangala Forum", 12.9345, 77.6112),
];

pub const DROPOFFS: &[Location] = &[
    Location::new("Kempegowda Bus Station", 12.9779, 77.5724),
    Location::new("Lalbagh West Gate", 12.9507, 77.5848),
    Location::new("UB City", 12.9716, 77.5961),
];
