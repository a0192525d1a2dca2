//! Signal smoothing and observation storage

pub mod kalman;
pub mod cache;

pub use kalman::SignalKalmanFilter;
pub use cache::{BeaconCache, BeaconCandidate, BeaconReport};
