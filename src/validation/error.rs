//! Error classification for the positioning engine
//!
//! Every failure here degrades to "no result" at the engine boundary;
//! none of these conditions panics. Stale beacons are not an error at
//! all: they silently leave the store through eviction.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Failure modes of observation intake and position solving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositioningError {
    /// An observation carried a non-finite coordinate or signal strength
    /// and was dropped at the boundary.
    MalformedObservation {
        reason: String,
    },

    /// Fewer live beacons than a solve requires.
    InsufficientBeacons {
        available: usize,
        required: usize,
    },

    /// The selected beacons are collinear or nearly so; the linearized
    /// system has no usable inverse.
    DegenerateGeometry {
        determinant: f64,
    },

    /// A registered callback handle was not found.
    UnknownCallbackHandle {
        handle_id: u32,
    },
}

impl fmt::Display for PositioningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositioningError::MalformedObservation { reason } => {
                write!(f, "Malformed observation: {}", reason)
            }
            PositioningError::InsufficientBeacons { available, required } => {
                write!(f, "Insufficient beacons: {} available, {} required", available, required)
            }
            PositioningError::DegenerateGeometry { determinant } => {
                write!(f, "Degenerate beacon geometry: determinant {:.6e}", determinant)
            }
            PositioningError::UnknownCallbackHandle { handle_id } => {
                write!(f, "Unknown callback handle: {}", handle_id)
            }
        }
    }
}

impl std::error::Error for PositioningError {}
