//! Field calibration helpers for the range model
//!
//! Both parameters of the log-distance model can be measured on site:
//! capture a batch of readings at 1 m to estimate the reference strength,
//! then a batch at a second known distance to estimate the path loss
//! exponent.

use crate::processing::kalman::SignalKalmanFilter;

/// Measurement noise used when smoothing calibration captures. Calibration
/// batches are short and noisy, so each individual sample gets less weight
/// than in live tracking.
pub const CALIBRATION_MEASUREMENT_NOISE: f64 = 4.0;

/// Leading samples dropped from a calibration batch before smoothing.
/// Readings taken while the operator is still settling into position are
/// discarded; batches at or under this size are used whole.
pub const CALIBRATION_WARMUP_SAMPLES: usize = 15;

/// Estimate the reference strength (dBm at 1 m) from readings captured at
/// one meter: drop the warmup prefix of a larger batch, smooth the rest,
/// then average the smoothed values.
///
/// Returns `None` for an empty batch.
pub fn estimate_reference_strength(samples_dbm: &[f64]) -> Option<f64> {
    let settled = if samples_dbm.len() > CALIBRATION_WARMUP_SAMPLES {
        &samples_dbm[CALIBRATION_WARMUP_SAMPLES..]
    } else {
        samples_dbm
    };
    if settled.is_empty() {
        return None;
    }
    let mut filter = SignalKalmanFilter::with_noise(0.01, CALIBRATION_MEASUREMENT_NOISE);
    let sum: f64 = settled.iter().map(|&s| filter.update(s)).sum();
    Some(sum / settled.len() as f64)
}

/// Estimate the path loss exponent from the mean strength observed at a
/// known distance: n = (reference - mean) / (10 * log10(distance)).
///
/// Returns `None` when the distance makes log10 zero or undefined
/// (non-positive, non-finite, or exactly 1 m).
pub fn estimate_path_loss_exponent(
    reference_strength_dbm: f64,
    mean_strength_dbm: f64,
    distance_m: f64,
) -> Option<f64> {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return None;
    }
    let denominator = 10.0 * distance_m.log10();
    if denominator == 0.0 {
        return None;
    }
    Some((reference_strength_dbm - mean_strength_dbm) / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::ranging::RangeModel;

    #[test]
    fn test_reference_strength_of_constant_batch() {
        let samples = [-41.0; 12];
        let estimate = estimate_reference_strength(&samples).unwrap();
        assert!((estimate - -41.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_strength_of_empty_batch() {
        assert!(estimate_reference_strength(&[]).is_none());
    }

    #[test]
    fn test_warmup_prefix_does_not_bias_the_estimate() {
        // 15 settling readings followed by 5 at the true level
        let mut samples = vec![-80.0; CALIBRATION_WARMUP_SAMPLES];
        samples.extend_from_slice(&[-42.0; 5]);

        let estimate = estimate_reference_strength(&samples).unwrap();
        assert!((estimate - -42.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_strength_lands_between_extremes() {
        let samples = [-44.0, -40.0, -42.0, -41.0, -43.0, -39.0];
        let estimate = estimate_reference_strength(&samples).unwrap();
        assert!(estimate > -44.0);
        assert!(estimate < -39.0);
    }

    #[test]
    fn test_exponent_from_exact_decade() {
        // At 10 m, log10 is exactly 1, so n = (ref - mean) / 10
        let n = estimate_path_loss_exponent(-40.0, -65.0, 10.0).unwrap();
        assert!((n - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_exponent_rejects_degenerate_distances() {
        assert!(estimate_path_loss_exponent(-40.0, -60.0, 1.0).is_none());
        assert!(estimate_path_loss_exponent(-40.0, -60.0, 0.0).is_none());
        assert!(estimate_path_loss_exponent(-40.0, -60.0, -3.0).is_none());
        assert!(estimate_path_loss_exponent(-40.0, -60.0, f64::NAN).is_none());
    }

    #[test]
    fn test_exponent_round_trips_through_range_model() {
        let model = RangeModel::default();
        let distance = 4.0_f64;
        let strength = model.reference_strength_dbm
            - 10.0 * model.path_loss_exponent * distance.log10();

        let n = estimate_path_loss_exponent(model.reference_strength_dbm, strength, distance)
            .unwrap();
        assert!((n - model.path_loss_exponent).abs() < 1e-9);
    }
}
