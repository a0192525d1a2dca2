//! Outward-facing report types

use serde::{Deserialize, Serialize};

use crate::core::{ComputedPosition, DISPLAY_UNITS_PER_METER};

/// Position report served to the reporting layer
///
/// `x` is east and `y` is north (Cartesian floor-plan axes). Map widgets
/// that take a latitude-first pair put the north component first, so feed
/// those `(y, x)`. Display values are floor-plan pixels, meter values are
/// the solved coordinates. `Default` is the explicit zero report returned
/// whenever no position can be computed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionReport {
    pub x_display: f64,
    pub y_display: f64,
    pub x_m: f64,
    pub y_m: f64,
}

impl From<ComputedPosition> for PositionReport {
    fn from(position: ComputedPosition) -> Self {
        Self {
            x_display: position.east_m * DISPLAY_UNITS_PER_METER,
            y_display: position.north_m * DISPLAY_UNITS_PER_METER,
            x_m: position.east_m,
            y_m: position.north_m,
        }
    }
}
