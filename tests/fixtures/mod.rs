//! Test fixtures for ride-sim.
//!
//! Provides:
//! - Real Bengaluru locations (from OpenStreetMap)
//! - A scripted route client that records calls and can be switched offline

#![allow(dead_code)]

pub mod bengaluru_locations;

pub use bengaluru_locations::*;

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use ride_sim::straight_line::StraightLineClient;
use ride_sim::{RouteClient, RouteError, RouteResult};

/// Straight-line routes with a kill switch and a call log.
pub struct ScriptedClient {
    inner: StraightLineClient,
    online: AtomicBool,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new(segments: usize) -> Self {
        Self {
            inner: StraightLineClient::new(40.0, segments),
            online: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl RouteClient for ScriptedClient {
    fn fetch_route(&self, origin: &str, destination: &str) -> Result<RouteResult, RouteError> {
        self.calls
            .lock()
            .unwrap()
            .push((origin.to_string(), destination.to_string()));
        if !self.online.load(Ordering::SeqCst) {
            return Err(RouteError::Transport("connection refused".to_string()));
        }
        self.inner.fetch_route(origin, destination)
    }
}
