//! Failure classification

pub mod error;

pub use error::PositioningError;
