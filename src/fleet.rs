//! Ambient fleet: background vehicles drifting around a center point.
//!
//! Every vehicle follows a short road segment and asks for a new one when it
//! reaches the end. Segment requests leave the controller as
//! [`RefreshRequest`]s and come back through [`FleetController::apply_refresh`],
//! possibly out of order. Each request carries a token; a response is applied
//! only while its entry still waits on that exact token, so responses for
//! entries that were reseeded or torn down in the meantime are dropped.

use std::f64::consts::TAU;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::agent::{AgentSimulator, AgentUpdate};
use crate::config::FleetConfig;
use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::route::{RouteResult, RouteTotals};
use crate::traits::RouteClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    Car,
    Scooter,
    ThreeWheeler,
}

impl VehicleKind {
    /// Kinds cycle scooter, car, three-wheeler by seed index.
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => VehicleKind::Scooter,
            1 => VehicleKind::Car,
            _ => VehicleKind::ThreeWheeler,
        }
    }
}

/// Origin and destination of a vehicle's first segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPlan {
    pub index: usize,
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Lays `config.count` vehicles out on a ring around `center`.
pub fn seed_plans(center: Coordinate, config: &FleetConfig) -> Vec<SeedPlan> {
    let count = config.count;
    (0..count)
        .map(|index| {
            let angle = TAU * index as f64 / count as f64;
            let radius = config.radius_for(index);
            SeedPlan {
                index,
                origin: center.offset(angle, radius),
                destination: center.offset(
                    angle + config.destination_angle_offset,
                    radius + config.destination_extra_radius,
                ),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct FleetEntry {
    id: String,
    kind: VehicleKind,
    agent: AgentSimulator,
    /// Token of the outstanding segment request, if any.
    pending: Option<u64>,
}

impl FleetEntry {
    fn new(id: String, kind: VehicleKind, path: Vec<Coordinate>, totals: RouteTotals) -> Self {
        let mut entry = Self {
            id,
            kind,
            agent: AgentSimulator::new(),
            pending: None,
        };
        entry.restart(path, totals);
        entry
    }

    /// Stable id assigned at seed time.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Vehicle kind, fixed for the lifetime of the entry.
    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    /// The simulator driving this vehicle along its current segment.
    pub fn agent(&self) -> &AgentSimulator {
        &self.agent
    }

    /// Current position, or `None` if the entry never got a path.
    pub fn position(&self) -> Option<Coordinate> {
        self.agent.position()
    }

    /// `true` while a segment request for this entry is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.pending.is_some()
    }

    fn update(&self, position: Coordinate) -> AgentUpdate {
        AgentUpdate {
            id: self.id.clone(),
            position,
            remaining: None,
        }
    }

    /// Puts the agent on `path`. An empty path leaves the entry idle with no
    /// position; it is skipped by ticks until the fleet is reseeded.
    fn restart(&mut self, path: Vec<Coordinate>, totals: RouteTotals) {
        if let Err(err) = self.agent.start(path, totals) {
            warn!(id = %self.id, error = %err, "vehicle left idle");
            self.agent.clear();
        }
    }

    fn collapse(&mut self, at: Coordinate) {
        self.restart(vec![at], RouteTotals::ZERO);
    }
}

/// A request for a fresh segment, tagged with the token that must still be
/// current when the response is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRequest {
    pub id: String,
    pub token: u64,
    pub origin: Coordinate,
    pub destination: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new segment replaced the entry's path.
    Applied,
    /// The request failed; the entry now idles on its current point.
    Collapsed,
    /// The entry no longer waits on this request; nothing changed.
    Stale,
}

/// Output of one fleet tick.
#[derive(Debug, Clone, Default)]
pub struct FleetTick {
    pub updates: Vec<AgentUpdate>,
    pub requests: Vec<RefreshRequest>,
}

#[derive(Debug, Clone)]
pub struct FleetController {
    center: Coordinate,
    config: FleetConfig,
    entries: Vec<FleetEntry>,
    next_token: u64,
    active: bool,
}

impl FleetController {
    /// Creates an empty, inactive fleet. Call [`seed`](Self::seed) to populate it.
    pub fn new(center: Coordinate, config: FleetConfig) -> Self {
        Self {
            center,
            config,
            entries: Vec::new(),
            next_token: 0,
            active: false,
        }
    }

    /// (Re)builds every entry around `center`, fetching seed segments in
    /// parallel. A failed fetch leaves that vehicle parked on its origin; it
    /// asks for a new segment on its first tick.
    ///
    /// Replacing the entries invalidates every outstanding request.
    pub fn seed<C: RouteClient>(&mut self, center: Coordinate, client: &C) {
        self.center = center;
        let plans = seed_plans(center, &self.config);
        debug!(count = plans.len(), %center, "seeding fleet");

        let results: Vec<Result<RouteResult, RouteError>> = plans
            .par_iter()
            .map(|plan| {
                client.fetch_route(&plan.origin.to_descriptor(), &plan.destination.to_descriptor())
            })
            .collect();

        self.entries = plans
            .iter()
            .zip(results)
            .map(|(plan, result)| {
                let (path, totals) = match result {
                    Ok(route) if !route.coordinates.is_empty() => {
                        let totals = route.totals();
                        (route.coordinates, totals)
                    }
                    Ok(_) => {
                        warn!(index = plan.index, "seed route came back empty, parking vehicle");
                        (vec![plan.origin], RouteTotals::ZERO)
                    }
                    Err(err) => {
                        warn!(index = plan.index, error = %err, "seed route failed, parking vehicle");
                        (vec![plan.origin], RouteTotals::ZERO)
                    }
                };
                FleetEntry::new(plan.index.to_string(), VehicleKind::for_index(plan.index), path, totals)
            })
            .collect();
        self.active = true;
    }

    /// Rebuilds the fleet around its current center. Every outstanding
    /// request becomes stale.
    pub fn reseed<C: RouteClient>(&mut self, client: &C) {
        self.seed(self.center, client);
    }

    /// Removes every vehicle and stops ticking. Responses still in flight
    /// become stale.
    pub fn teardown(&mut self) {
        debug!(count = self.entries.len(), "tearing down fleet");
        self.entries.clear();
        self.active = false;
    }

    /// Advances every vehicle by one coordinate.
    ///
    /// A vehicle that reaches the end of its segment issues exactly one
    /// refresh request toward a random bearing; it holds its position until
    /// that request is applied.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FleetTick {
        let mut out = FleetTick::default();
        if !self.active {
            return out;
        }

        for entry in &mut self.entries {
            if entry.pending.is_some() {
                if let Some(position) = entry.position() {
                    out.updates.push(entry.update(position));
                }
                continue;
            }

            let Some(step) = entry.agent.tick() else {
                continue;
            };
            out.updates.push(entry.update(step.position));

            if step.completed {
                let token = self.next_token;
                self.next_token += 1;
                entry.pending = Some(token);

                let bearing = rng.gen_range(0.0..TAU);
                let request = RefreshRequest {
                    id: entry.id.clone(),
                    token,
                    origin: step.position,
                    destination: step.position.offset(bearing, self.config.refresh_offset),
                };
                trace!(id = %request.id, token, "requesting new segment");
                out.requests.push(request);
            }
        }

        out
    }

    /// Applies the response to `request` if its entry still waits on it.
    pub fn apply_refresh(
        &mut self,
        request: &RefreshRequest,
        result: Result<RouteResult, RouteError>,
    ) -> RefreshOutcome {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == request.id && entry.pending == Some(request.token))
        else {
            trace!(id = %request.id, token = request.token, "discarding stale segment");
            return RefreshOutcome::Stale;
        };
        entry.pending = None;

        let here = entry.position().unwrap_or(request.origin);
        match result {
            Ok(route) if !route.coordinates.is_empty() => {
                let totals = route.totals();
                entry.restart(route.coordinates, totals);
                RefreshOutcome::Applied
            }
            Ok(_) => {
                entry.collapse(here);
                RefreshOutcome::Collapsed
            }
            Err(err) => {
                debug!(id = %entry.id, error = %err, "segment refresh failed, idling in place");
                entry.collapse(here);
                RefreshOutcome::Collapsed
            }
        }
    }

    /// Ticks once and resolves the resulting refresh requests before
    /// returning. Convenient when the route client is fast or local.
    pub fn tick_and_refresh<R, C>(&mut self, rng: &mut R, client: &C) -> Vec<AgentUpdate>
    where
        R: Rng + ?Sized,
        C: RouteClient,
    {
        let FleetTick { updates, requests } = self.tick(rng);
        for (request, result) in resolve_refreshes(client, requests) {
            self.apply_refresh(&request, result);
        }
        updates
    }

    /// Point the ring was last seeded around.
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Seeding and refresh geometry.
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Entries in seed order.
    pub fn entries(&self) -> &[FleetEntry] {
        &self.entries
    }

    /// Looks an entry up by its id.
    pub fn entry(&self, id: &str) -> Option<&FleetEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Number of vehicles currently in the fleet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `false` before the first seed and after teardown.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Fetches every requested segment in parallel. Results keep request order.
pub fn resolve_refreshes<C: RouteClient>(
    client: &C,
    requests: Vec<RefreshRequest>,
) -> Vec<(RefreshRequest, Result<RouteResult, RouteError>)> {
    requests
        .into_par_iter()
        .map(|request| {
            let result = client.fetch_route(
                &request.origin.to_descriptor(),
                &request.destination.to_descriptor(),
            );
            (request, result)
        })
        .collect()
}
