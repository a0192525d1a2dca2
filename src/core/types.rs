//! Core data types for the positioning engine

use serde::{Deserialize, Serialize};

/// Micro display units per raw display unit, the quantization step for
/// beacon identity coordinates.
const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Identity of a beacon: building, floor, and advertised position on the
/// floor plan, in that significance order.
///
/// Coordinates arrive as decoded floating-point display units and are
/// quantized to integer micro-units, so equality and hashing are exact.
/// One micro-unit is far below decode precision: distinct advertised
/// positions never collide, and float noise under a micro-unit cannot
/// split one beacon into two identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeaconPosition {
    building_id: u32,
    floor: i32,
    north_micros: i64,
    east_micros: i64,
}

impl BeaconPosition {
    /// Builds a beacon identity from decoded advertisement fields.
    ///
    /// Returns `None` when either coordinate is non-finite, so a malformed
    /// identity cannot be constructed.
    pub fn new(building_id: u32, floor: i32, north_raw: f64, east_raw: f64) -> Option<Self> {
        if !north_raw.is_finite() || !east_raw.is_finite() {
            return None;
        }
        Some(BeaconPosition {
            building_id,
            floor,
            north_micros: (north_raw * MICROS_PER_UNIT).round() as i64,
            east_micros: (east_raw * MICROS_PER_UNIT).round() as i64,
        })
    }

    pub fn building_id(&self) -> u32 {
        self.building_id
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// North coordinate in raw display units.
    pub fn north_raw(&self) -> f64 {
        self.north_micros as f64 / MICROS_PER_UNIT
    }

    /// East coordinate in raw display units.
    pub fn east_raw(&self) -> f64 {
        self.east_micros as f64 / MICROS_PER_UNIT
    }
}

/// One decoded beacon advertisement with its received signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub building_id: u32,
    pub floor: i32,
    pub north_raw: f64,
    pub east_raw: f64,
    /// Received signal strength (dBm).
    pub strength_dbm: f64,
}

/// Receiver position solved by trilateration, in meters, tagged with the
/// building and floor of the reference beacon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputedPosition {
    pub north_m: f64,
    pub east_m: f64,
    pub building_id: u32,
    pub floor: i32,
}
