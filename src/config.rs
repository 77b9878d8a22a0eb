//! Caller-supplied tuning for the simulation.
//!
//! Defaults reproduce the reference client: a 300 ms primary cadence, 700 ms
//! for the driver and the ambient fleet, and a seed ring of roughly 400-800 m.

use std::f64::consts::FRAC_PI_3;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Tick interval of the rider's vehicle along the searched route.
    pub primary_interval_ms: u64,
    /// Tick interval of the driver heading to the pickup.
    pub driver_interval_ms: u64,
    /// Shared tick interval of the ambient fleet.
    pub fleet_interval_ms: u64,
    /// Distance (degrees) from the pickup at which the driver is spawned.
    pub driver_spawn_radius: f64,
    pub fleet: FleetConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            primary_interval_ms: 300,
            driver_interval_ms: 700,
            fleet_interval_ms: 700,
            driver_spawn_radius: 0.006,
            fleet: FleetConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn primary_interval(&self) -> Duration {
        Duration::from_millis(self.primary_interval_ms)
    }

    pub fn driver_interval(&self) -> Duration {
        Duration::from_millis(self.driver_interval_ms)
    }

    pub fn fleet_interval(&self) -> Duration {
        Duration::from_millis(self.fleet_interval_ms)
    }
}

/// Ring seeding and refresh geometry for the ambient fleet. Radii are degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub count: usize,
    pub base_radius: f64,
    pub radius_step: f64,
    /// Number of distinct radii before the ramp wraps around.
    pub radius_cycle: usize,
    pub destination_extra_radius: f64,
    /// Angular offset (radians) of each seed destination from its origin.
    pub destination_angle_offset: f64,
    /// How far a fresh segment reaches from the vehicle's current position.
    pub refresh_offset: f64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            count: 12,
            base_radius: 0.004,
            radius_step: 0.001,
            radius_cycle: 5,
            destination_extra_radius: 0.002,
            destination_angle_offset: FRAC_PI_3,
            refresh_offset: 0.002,
        }
    }
}

impl FleetConfig {
    /// Seed radius for the entry at `index`.
    pub fn radius_for(&self, index: usize) -> f64 {
        let step = index % self.radius_cycle.max(1);
        self.base_radius + step as f64 * self.radius_step
    }
}
