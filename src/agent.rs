//! Single-agent simulation: a cursor stepping along a fixed coordinate path.
//!
//! The simulator is timer-agnostic. Each [`AgentSimulator::tick`] advances the
//! cursor by exactly one coordinate, regardless of how far apart the
//! coordinates are; callers decide how often to tick.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::geo::Coordinate;
use crate::route::RouteTotals;

/// Distance and time left on the current path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingEstimate {
    pub meters: u64,
    pub seconds: u64,
}

impl RemainingEstimate {
    pub const ZERO: RemainingEstimate = RemainingEstimate { meters: 0, seconds: 0 };

    /// Scales `totals` by the fraction of the path still ahead of `cursor`.
    pub fn at(totals: RouteTotals, cursor: usize, path_len: usize) -> Self {
        if path_len <= 1 {
            return Self::ZERO;
        }
        let ratio = 1.0 - cursor as f64 / (path_len - 1) as f64;
        Self {
            meters: (totals.distance_meters as f64 * ratio).round() as u64,
            seconds: (totals.duration_seconds as f64 * ratio).round() as u64,
        }
    }

    /// Whole minutes for display, never less than one.
    pub fn eta_minutes(&self) -> u64 {
        ((self.seconds as f64 / 60.0).round() as u64).max(1)
    }

    pub fn kilometers(&self) -> f64 {
        self.meters as f64 / 1000.0
    }
}

impl From<RouteTotals> for RemainingEstimate {
    fn from(totals: RouteTotals) -> Self {
        Self {
            meters: totals.distance_meters,
            seconds: totals.duration_seconds,
        }
    }
}

impl fmt::Display for RemainingEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min • {:.1} km", self.eta_minutes(), self.kilometers())
    }
}

/// Path, cursor and totals owned by one simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    path: Vec<Coordinate>,
    cursor_index: usize,
    totals: RouteTotals,
}

impl AgentState {
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn totals(&self) -> RouteTotals {
        self.totals
    }

    pub fn position(&self) -> Coordinate {
        self.path[self.cursor_index]
    }

    pub fn remaining(&self) -> RemainingEstimate {
        RemainingEstimate::at(self.totals, self.cursor_index, self.path.len())
    }

    pub fn is_complete(&self) -> bool {
        self.cursor_index + 1 >= self.path.len()
    }
}

/// Result of starting or ticking an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub position: Coordinate,
    pub remaining: RemainingEstimate,
    pub completed: bool,
}

/// What the rendering layer receives for each active agent on each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdate {
    pub id: String,
    pub position: Coordinate,
    pub remaining: Option<RemainingEstimate>,
}

/// Advances one agent along a path, one coordinate per tick.
#[derive(Debug, Clone, Default)]
pub struct AgentSimulator {
    state: Option<AgentState>,
    running: bool,
    generation: u64,
}

impl AgentSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any current path and rewinds the cursor to its first point.
    ///
    /// The returned step reports `path[0]` with the full `totals` remaining.
    pub fn start(&mut self, path: Vec<Coordinate>, totals: RouteTotals) -> SimResult<Step> {
        if path.is_empty() {
            return Err(SimError::EmptyPath);
        }

        self.generation += 1;
        self.running = true;
        let state = self.state.insert(AgentState {
            path,
            cursor_index: 0,
            totals,
        });

        Ok(Step {
            position: state.path[0],
            remaining: totals.into(),
            completed: false,
        })
    }

    /// Advances the cursor by one coordinate, clamped to the last one.
    ///
    /// Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<Step> {
        if !self.running {
            return None;
        }
        let state = self.state.as_mut()?;

        let last = state.path.len() - 1;
        state.cursor_index = (state.cursor_index + 1).min(last);

        Some(Step {
            position: state.position(),
            remaining: state.remaining(),
            completed: state.cursor_index == last,
        })
    }

    /// Halts ticking. The last position stays readable until the next `start`.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops and forgets the current path.
    pub fn clear(&mut self) {
        self.running = false;
        self.state = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Incremented by every successful `start`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> Option<&AgentState> {
        self.state.as_ref()
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.state.as_ref().map(AgentState::position)
    }

    pub fn remaining(&self) -> Option<RemainingEstimate> {
        self.state.as_ref().map(AgentState::remaining)
    }
}
