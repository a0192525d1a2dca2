//! Core positioning algorithms

pub mod ranging;
pub mod calibration;
pub mod trilateration;

pub use ranging::RangeModel;
pub use calibration::{estimate_path_loss_exponent, estimate_reference_strength};
pub use trilateration::TrilaterationSolver;
