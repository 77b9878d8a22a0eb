//! One ride search: the rider's vehicle along the searched route and a driver
//! approaching the pickup.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::{debug, warn};

use crate::agent::{AgentSimulator, AgentUpdate, RemainingEstimate};
use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::route::RouteResult;
use crate::traits::RouteClient;

pub const PRIMARY_AGENT_ID: &str = "primary";
pub const DRIVER_AGENT_ID: &str = "driver";

/// A pin on the map with its provider-reported address.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub position: Coordinate,
    pub address: String,
}

/// Summary of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub route: RouteResult,
    /// The driver's route to the pickup, absent if it could not be fetched.
    pub driver_route: Option<RouteResult>,
    /// Initial updates for the primary agent and, if present, the driver.
    pub updates: Vec<AgentUpdate>,
}

#[derive(Debug, Clone)]
pub struct RideSession {
    driver_spawn_radius: f64,
    route: Option<RouteResult>,
    driver_route: Option<RouteResult>,
    primary: AgentSimulator,
    driver: AgentSimulator,
}

impl RideSession {
    pub fn new(driver_spawn_radius: f64) -> Self {
        Self {
            driver_spawn_radius,
            route: None,
            driver_route: None,
            primary: AgentSimulator::new(),
            driver: AgentSimulator::new(),
        }
    }

    /// Runs a new search, superseding whatever the session was showing.
    ///
    /// The previous simulations are cancelled before the first request goes
    /// out. If the primary route cannot be fetched the session stays empty and
    /// the error is returned. A failed driver route only leaves the driver out.
    pub fn search<C, R>(
        &mut self,
        client: &C,
        rng: &mut R,
        origin: &str,
        destination: &str,
    ) -> Result<SearchOutcome, RouteError>
    where
        C: RouteClient,
        R: Rng + ?Sized,
    {
        self.clear();
        debug!(origin, destination, "searching route");

        let route = client.fetch_route(origin, destination)?;
        let Some(pickup) = route.start() else {
            return Err(RouteError::Unavailable(format!("empty route from {origin} to {destination}")));
        };

        let mut updates = Vec::with_capacity(2);
        let step = self
            .primary
            .start(route.coordinates.clone(), route.totals())
            .map_err(|err| RouteError::Unavailable(err.to_string()))?;
        updates.push(AgentUpdate {
            id: PRIMARY_AGENT_ID.to_string(),
            position: step.position,
            remaining: Some(step.remaining),
        });

        let bearing = rng.gen_range(0.0..TAU);
        let driver_start = pickup.offset(bearing, self.driver_spawn_radius);
        let driver_route = match client.fetch_route(&driver_start.to_descriptor(), &pickup.to_descriptor()) {
            Ok(driver_route) => match self.driver.start(driver_route.coordinates.clone(), driver_route.totals()) {
                Ok(step) => {
                    updates.push(AgentUpdate {
                        id: DRIVER_AGENT_ID.to_string(),
                        position: step.position,
                        remaining: Some(step.remaining),
                    });
                    Some(driver_route)
                }
                Err(err) => {
                    warn!(error = %err, "driver route has no coordinates");
                    None
                }
            },
            Err(err) => {
                warn!(error = %err, %driver_start, "driver route failed");
                None
            }
        };

        debug!(
            points = route.coordinates.len(),
            distance_m = route.distance_meters,
            driver = driver_route.is_some(),
            "search complete"
        );
        self.route = Some(route.clone());
        self.driver_route = driver_route.clone();

        Ok(SearchOutcome {
            route,
            driver_route,
            updates,
        })
    }

    /// Returns the session to its pre-search state.
    pub fn clear(&mut self) {
        self.primary.clear();
        self.driver.clear();
        self.route = None;
        self.driver_route = None;
    }

    /// Advances the rider's vehicle. It stops itself at the end of the route.
    pub fn tick_primary(&mut self) -> Option<AgentUpdate> {
        Self::tick_agent(&mut self.primary, PRIMARY_AGENT_ID)
    }

    /// Advances the driver. It stops itself on arrival at the pickup.
    pub fn tick_driver(&mut self) -> Option<AgentUpdate> {
        Self::tick_agent(&mut self.driver, DRIVER_AGENT_ID)
    }

    fn tick_agent(agent: &mut AgentSimulator, id: &str) -> Option<AgentUpdate> {
        let step = agent.tick()?;
        if step.completed {
            agent.stop();
        }
        Some(AgentUpdate {
            id: id.to_string(),
            position: step.position,
            remaining: Some(step.remaining),
        })
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn driver_route(&self) -> Option<&RouteResult> {
        self.driver_route.as_ref()
    }

    pub fn pickup(&self) -> Option<Waypoint> {
        let route = self.route.as_ref()?;
        Some(Waypoint {
            position: route.start()?,
            address: route.start_address.clone(),
        })
    }

    pub fn dropoff(&self) -> Option<Waypoint> {
        let route = self.route.as_ref()?;
        Some(Waypoint {
            position: route.end()?,
            address: route.end_address.clone(),
        })
    }

    pub fn primary(&self) -> &AgentSimulator {
        &self.primary
    }

    pub fn driver(&self) -> &AgentSimulator {
        &self.driver
    }

    /// Time and distance left for the driver to reach the pickup.
    pub fn driver_eta(&self) -> Option<RemainingEstimate> {
        self.driver_route.as_ref()?;
        self.driver.remaining()
    }

    pub fn is_active(&self) -> bool {
        self.route.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Serves a fixed route for the rider and a two-point hop for the driver.
    struct FixedClient {
        route: Option<RouteResult>,
        driver_ok: bool,
    }

    impl RouteClient for FixedClient {
        fn fetch_route(&self, origin: &str, destination: &str) -> Result<RouteResult, RouteError> {
            if origin == "home" {
                return self.route.clone().ok_or_else(|| RouteError::Unavailable("No route found".into()));
            }
            if !self.driver_ok {
                return Err(RouteError::Transport("timeout".into()));
            }
            let from = Coordinate::parse_descriptor(origin).unwrap();
            let to = Coordinate::parse_descriptor(destination).unwrap();
            Ok(RouteResult {
                coordinates: vec![from, to],
                start_address: origin.to_string(),
                end_address: destination.to_string(),
                distance_meters: 600,
                duration_seconds: 120,
            })
        }
    }

    fn ride() -> RouteResult {
        RouteResult {
            coordinates: vec![
                Coordinate::new(12.9716, 77.5946),
                Coordinate::new(12.9720, 77.5950),
                Coordinate::new(12.9730, 77.5960),
            ],
            start_address: "MG Road".to_string(),
            end_address: "Cubbon Park".to_string(),
            distance_meters: 400,
            duration_seconds: 90,
        }
    }

    #[test]
    fn test_search_starts_both_agents() {
        let client = FixedClient { route: Some(ride()), driver_ok: true };
        let mut rng = SmallRng::seed_from_u64(11);
        let mut session = RideSession::new(0.006);

        let outcome = session.search(&client, &mut rng, "home", "work").unwrap();
        assert_eq!(outcome.updates.len(), 2);
        assert_eq!(outcome.updates[0].id, PRIMARY_AGENT_ID);
        assert_eq!(outcome.updates[0].position, Coordinate::new(12.9716, 77.5946));

        let driver_route = outcome.driver_route.unwrap();
        assert_eq!(driver_route.end(), Some(Coordinate::new(12.9716, 77.5946)));
        let start = driver_route.start().unwrap();
        let offset = ((start.latitude - 12.9716).powi(2) + (start.longitude - 77.5946).powi(2)).sqrt();
        assert!((offset - 0.006).abs() < 1e-9);

        assert_eq!(session.pickup().unwrap().address, "MG Road");
        assert_eq!(session.dropoff().unwrap().position, Coordinate::new(12.9730, 77.5960));
        assert_eq!(session.driver_eta(), Some(RemainingEstimate { meters: 600, seconds: 120 }));
    }

    #[test]
    fn test_failed_search_leaves_session_empty() {
        let good = FixedClient { route: Some(ride()), driver_ok: true };
        let bad = FixedClient { route: None, driver_ok: true };
        let mut rng = SmallRng::seed_from_u64(12);
        let mut session = RideSession::new(0.006);

        session.search(&good, &mut rng, "home", "work").unwrap();
        session.tick_primary();

        let err = session.search(&bad, &mut rng, "home", "work").unwrap_err();
        assert!(matches!(err, RouteError::Unavailable(_)));
        assert!(!session.is_active());
        assert!(session.primary().position().is_none());
        assert!(session.driver().position().is_none());
        assert!(session.tick_primary().is_none());
        assert!(session.tick_driver().is_none());
    }

    #[test]
    fn test_driver_failure_keeps_primary() {
        let client = FixedClient { route: Some(ride()), driver_ok: false };
        let mut rng = SmallRng::seed_from_u64(13);
        let mut session = RideSession::new(0.006);

        let outcome = session.search(&client, &mut rng, "home", "work").unwrap();
        assert!(outcome.driver_route.is_none());
        assert_eq!(outcome.updates.len(), 1);
        assert!(session.tick_primary().is_some());
        assert!(session.tick_driver().is_none());
        assert_eq!(session.driver_eta(), None);
    }

    #[test]
    fn test_new_search_restarts_primary() {
        let client = FixedClient { route: Some(ride()), driver_ok: true };
        let mut rng = SmallRng::seed_from_u64(14);
        let mut session = RideSession::new(0.006);

        session.search(&client, &mut rng, "home", "work").unwrap();
        session.tick_primary();
        let generation = session.primary().generation();

        session.search(&client, &mut rng, "home", "work").unwrap();
        assert_eq!(session.primary().generation(), generation + 1);
        assert_eq!(session.primary().state().unwrap().cursor_index(), 0);
    }

    #[test]
    fn test_primary_stops_at_destination() {
        let client = FixedClient { route: Some(ride()), driver_ok: true };
        let mut rng = SmallRng::seed_from_u64(15);
        let mut session = RideSession::new(0.006);
        session.search(&client, &mut rng, "home", "work").unwrap();

        assert!(session.tick_primary().is_some());
        let last = session.tick_primary().unwrap();
        assert_eq!(last.position, Coordinate::new(12.9730, 77.5960));
        assert_eq!(last.remaining, Some(RemainingEstimate::ZERO));
        assert!(session.tick_primary().is_none());
        assert!(!session.primary().is_running());
        // Still shown at the destination.
        assert_eq!(session.primary().position(), Some(Coordinate::new(12.9730, 77.5960)));
    }
}
