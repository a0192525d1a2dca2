//! Linearized 2-D trilateration over the three nearest beacons

use nalgebra::{Matrix2, Vector2};

use crate::core::{ComputedPosition, DISPLAY_UNITS_PER_METER, SOLVER_BEACON_COUNT};
use crate::processing::cache::{BeaconCache, BeaconCandidate};
use crate::validation::error::PositioningError;

/// Determinant magnitude below which the beacon geometry is treated as
/// collinear
const SINGULARITY_THRESHOLD: f64 = 1e-10;

/// Solves the receiver position from the three nearest live beacons.
///
/// Subtracting the squared-range equation of the nearest beacon from the
/// other two cancels the quadratic terms and leaves a 2x2 linear system in
/// the receiver coordinates.
#[derive(Debug, Clone)]
pub struct TrilaterationSolver {
    /// Raw display units per meter, for converting beacon coordinates
    display_units_per_meter: f64,
}

impl Default for TrilaterationSolver {
    fn default() -> Self {
        Self {
            display_units_per_meter: DISPLAY_UNITS_PER_METER,
        }
    }
}

impl TrilaterationSolver {
    /// Create a solver using the standard floor-plan scale
    pub fn new() -> Self {
        Self::default()
    }

    /// Solve once over the store's current nearest beacons.
    ///
    /// No partial solve and no retry: fewer than three live beacons or a
    /// collinear constellation returns an error and the caller decides
    /// when to ask again.
    pub fn solve(&self, cache: &BeaconCache) -> Result<ComputedPosition, PositioningError> {
        let slots = cache.best(SOLVER_BEACON_COUNT);
        let candidates: Vec<BeaconCandidate> = slots.iter().flatten().copied().collect();
        if candidates.len() < SOLVER_BEACON_COUNT {
            return Err(PositioningError::InsufficientBeacons {
                available: candidates.len(),
                required: SOLVER_BEACON_COUNT,
            });
        }

        // Beacon coordinates arrive in raw display units; solve in meters
        let scale = self.display_units_per_meter;
        let x: Vec<f64> = candidates
            .iter()
            .map(|c| c.position.east_raw() / scale)
            .collect();
        let y: Vec<f64> = candidates
            .iter()
            .map(|c| c.position.north_raw() / scale)
            .collect();
        let d: Vec<f64> = candidates.iter().map(|c| c.distance_m).collect();

        // Linearize around the nearest beacon
        let mut a_matrix = Matrix2::zeros();
        let mut b_vector = Vector2::zeros();
        for i in 1..SOLVER_BEACON_COUNT {
            let row = i - 1;
            a_matrix[(row, 0)] = 2.0 * (x[i] - x[0]);
            a_matrix[(row, 1)] = 2.0 * (y[i] - y[0]);
            b_vector[row] = d[0].powi(2) - d[i].powi(2)
                + x[i].powi(2) - x[0].powi(2)
                + y[i].powi(2) - y[0].powi(2);
        }

        let determinant = a_matrix.determinant();
        if !determinant.is_finite() || determinant.abs() < SINGULARITY_THRESHOLD {
            return Err(PositioningError::DegenerateGeometry { determinant });
        }
        let solution = match a_matrix.try_inverse() {
            Some(inverse) => inverse * b_vector,
            None => return Err(PositioningError::DegenerateGeometry { determinant }),
        };

        let reference = candidates[0].position;
        Ok(ComputedPosition {
            north_m: solution.y,
            east_m: solution.x,
            building_id: reference.building_id(),
            floor: reference.floor(),
        })
    }
}
