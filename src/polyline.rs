//! Encoded polyline codec for route geometries.
//!
//! Route providers ship geometries in Google's encoded polyline format: each
//! coordinate component is a signed delta from the previous point, zig-zag
//! encoded and split into 5-bit groups offset into printable ASCII. Decoding
//! happens once at the provider boundary; everything downstream works on
//! [`Coordinate`] sequences.

use serde::{Deserialize, Serialize};

use crate::error::{PolylineError, PolylineResult};
use crate::geo::Coordinate;

/// Decimal digits used by Google Directions and OSRM's default `polyline`.
pub const DEFAULT_PRECISION: u32 = 5;

/// First character of the encoding alphabet.
const CHAR_OFFSET: u8 = 63;
/// Highest character a valid encoder can produce (`63 + 0x3f`).
const CHAR_MAX: u8 = 126;
const CONTINUATION_BIT: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;
/// Groups beyond this no longer fit the 64-bit accumulator.
const MAX_GROUPS: u32 = 12;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline at the default precision.
    pub fn decode(encoded: &str) -> PolylineResult<Self> {
        decode(encoded).map(Self::new)
    }

    /// Encodes the points back into the compact text form.
    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Decodes a polyline at 1e5 precision.
pub fn decode(encoded: &str) -> PolylineResult<Vec<Coordinate>> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decodes a polyline whose values were scaled by `10^precision`.
pub fn decode_with_precision(encoded: &str, precision: u32) -> PolylineResult<Vec<Coordinate>> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while pos < bytes.len() {
        lat = lat.wrapping_add(read_value(encoded, &mut pos)?);
        lng = lng.wrapping_add(read_value(encoded, &mut pos)?);
        coordinates.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(coordinates)
}

/// Reads one zig-zag encoded value starting at `pos`, leaving `pos` on the
/// first byte after it.
fn read_value(encoded: &str, pos: &mut usize) -> PolylineResult<i64> {
    let bytes = encoded.as_bytes();
    let mut result: u64 = 0;
    let mut groups = 0;

    loop {
        let offset = *pos;
        let byte = *bytes.get(offset).ok_or(PolylineError::Truncated(offset))?;
        if !(CHAR_OFFSET..=CHAR_MAX).contains(&byte) {
            let character = encoded[offset..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(PolylineError::InvalidCharacter { character, offset });
        }
        if groups == MAX_GROUPS {
            return Err(PolylineError::Overflow(offset));
        }

        let chunk = u64::from(byte - CHAR_OFFSET);
        result |= (chunk & CHUNK_MASK) << (5 * groups);
        groups += 1;
        *pos += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };
    Ok(value)
}

/// Encodes coordinates at 1e5 precision.
pub fn encode(points: &[Coordinate]) -> String {
    encode_with_precision(points, DEFAULT_PRECISION)
}

pub fn encode_with_precision(points: &[Coordinate], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.latitude * factor).round() as i64;
        let lng = (point.longitude * factor).round() as i64;
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn write_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 {
        !((delta as u64) << 1)
    } else {
        (delta as u64) << 1
    };

    while value >= CONTINUATION_BIT {
        let chunk = (CONTINUATION_BIT | (value & CHUNK_MASK)) as u8;
        out.push(char::from(chunk + CHAR_OFFSET));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHAR_OFFSET));
}
