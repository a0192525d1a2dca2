//! Engine facade and report types
//!
//! The callback-based engine suits the single-owner model: one caller
//! records observations and polls for positions, with optional observers
//! registered for successful solves.

pub mod callback;
pub mod types;

// Re-export commonly used API types
pub use callback::{CallbackHandle, EngineStatistics, PositionCallback, PositioningEngine};
pub use types::PositionReport;
