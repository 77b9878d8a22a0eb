//! ride-sim core
//!
//! Route-geometry decoding and position simulation for a ride-booking map:
//! decode provider polylines, then step the rider's vehicle, the pickup
//! driver and an ambient fleet along them.

pub mod error;
pub mod geo;
pub mod polyline;
pub mod route;
pub mod traits;
pub mod agent;
pub mod fleet;
pub mod session;
pub mod scheduler;
pub mod config;
pub mod directions;
pub mod osrm;
pub mod straight_line;

pub use agent::{AgentSimulator, AgentUpdate, RemainingEstimate};
pub use error::{PolylineError, RouteError, SimError};
pub use geo::Coordinate;
pub use route::{RouteResult, RouteTotals};
pub use traits::{RouteClient, UpdateSink};
