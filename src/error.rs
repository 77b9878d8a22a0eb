//! Error types for the simulation engine and its route adapters.

use thiserror::Error;

/// Failures while decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The input ended inside a continuation group, or between a latitude
    /// and its longitude.
    #[error("polyline truncated at byte {0}")]
    Truncated(usize),

    #[error("invalid polyline character {character:?} at byte {offset}")]
    InvalidCharacter { character: char, offset: usize },

    #[error("polyline value overflows at byte {0}")]
    Overflow(usize),
}

/// Failures raised by an agent simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("cannot start an agent on an empty path")]
    EmptyPath,
}

/// Failures at the route provider boundary.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route found: {0}")]
    Unavailable(String),

    #[error("route provider failure: {0}")]
    Transport(String),

    #[error("route geometry could not be decoded: {0}")]
    Geometry(#[from] PolylineError),
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        RouteError::Transport(err.to_string())
    }
}

pub type PolylineResult<T> = Result<T, PolylineError>;
pub type SimResult<T> = Result<T, SimError>;
