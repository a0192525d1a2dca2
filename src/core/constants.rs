//! Physical constants and fixed system parameters

/// Raw display units (floor-plan pixels) per meter.
///
/// Floor plans are rendered at 30 px per foot, and one meter is 3.28084 ft.
pub const DISPLAY_UNITS_PER_METER: f64 = 98.4252;

/// Signal strength samples retained per beacon; the oldest sample is
/// dropped once this capacity is reached.
pub const HISTORY_CAPACITY: usize = 10;

/// Number of beacons consumed by a single trilateration solve.
pub const SOLVER_BEACON_COUNT: usize = 3;
