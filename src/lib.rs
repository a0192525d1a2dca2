//! Indoor BLE Beacon Positioning
//!
//! A single-receiver indoor positioning engine. Fixed beacons advertise
//! their own floor-plan position; each decoded advertisement arrives with
//! a received signal strength. Per beacon, strengths are smoothed with a
//! scalar Kalman filter and converted to a range with a log-distance path
//! loss model. On demand the engine evicts stale beacons and trilaterates
//! the receiver position from the three nearest.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{
    BeaconPosition, ComputedPosition, Observation, DISPLAY_UNITS_PER_METER, HISTORY_CAPACITY,
    SOLVER_BEACON_COUNT,
};
pub use crate::algorithms::ranging::RangeModel;
pub use crate::algorithms::trilateration::TrilaterationSolver;
pub use crate::processing::cache::{BeaconCache, BeaconReport};
pub use crate::processing::kalman::SignalKalmanFilter;
pub use crate::validation::error::PositioningError;
pub use crate::utils::config::{ConfigError, EngineConfig};
pub use crate::api::{CallbackHandle, PositionCallback, PositionReport, PositioningEngine};
