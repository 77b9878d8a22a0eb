//! Seams between the engine and its collaborators.
//!
//! The engine never talks to a network or a screen directly: route geometry
//! comes in through [`RouteClient`] and position updates go out through
//! [`UpdateSink`]. Concrete apps implement them for their own providers and
//! rendering layers.

use crate::agent::AgentUpdate;
use crate::error::RouteError;
use crate::route::RouteResult;

/// Resolves a route between two location descriptors.
///
/// A descriptor is either a `"lat,lng"` literal or an opaque address string;
/// interpreting it is up to the implementation. Implementations must not
/// retry internally. `Sync` lets fleet requests be resolved in parallel.
pub trait RouteClient: Sync {
    fn fetch_route(&self, origin: &str, destination: &str) -> Result<RouteResult, RouteError>;
}

/// Receives every position update the engine produces.
///
/// Sinks are pure subscribers and perform no validation.
pub trait UpdateSink {
    fn publish(&mut self, update: AgentUpdate);
}

impl UpdateSink for Vec<AgentUpdate> {
    fn publish(&mut self, update: AgentUpdate) {
        self.push(update);
    }
}
