//! Scalar Kalman smoothing for beacon signal strength

/// One-dimensional Kalman filter for smoothing a beacon's signal strength.
///
/// The state is a single dBm value. The filter initializes lazily: the
/// first measurement is adopted as the estimate and returned unchanged,
/// so a beacon's first observation passes through exactly.
#[derive(Debug, Clone)]
pub struct SignalKalmanFilter {
    /// Process noise covariance
    pub process_noise: f64,
    /// Measurement noise covariance
    pub measurement_noise: f64,
    /// Current estimate (dBm), `None` until the first update
    pub estimate: Option<f64>,
    /// Estimate error covariance
    pub covariance: f64,
}

impl SignalKalmanFilter {
    /// Create a filter with default noise parameters
    pub fn new() -> Self {
        Self::with_noise(0.01, 1.0)
    }

    /// Create a filter with custom noise parameters
    pub fn with_noise(process_noise: f64, measurement_noise: f64) -> Self {
        Self {
            process_noise,
            measurement_noise,
            estimate: None,
            covariance: 1.0,
        }
    }

    /// Update the filter with a new measurement and return the estimate
    pub fn update(&mut self, measurement: f64) -> f64 {
        let estimate = match self.estimate {
            // First measurement - adopt it as the estimate
            None => measurement,
            Some(previous) => {
                let predicted_covariance = self.covariance + self.process_noise;
                let gain = predicted_covariance / (predicted_covariance + self.measurement_noise);
                self.covariance = (1.0 - gain) * predicted_covariance;
                previous + gain * (measurement - previous)
            }
        };
        self.estimate = Some(estimate);
        estimate
    }

    /// Get the current estimate, if the filter has seen a measurement
    pub fn estimate(&self) -> Option<f64> {
        self.estimate
    }

    /// Check if the filter has adopted a first measurement
    pub fn is_initialized(&self) -> bool {
        self.estimate.is_some()
    }

    /// Reset the filter to its uninitialized state
    pub fn reset(&mut self) {
        self.estimate = None;
        self.covariance = 1.0;
    }
}

impl Default for SignalKalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_returns_measurement_unchanged() {
        let mut filter = SignalKalmanFilter::new();
        assert!(!filter.is_initialized());

        let smoothed = filter.update(-67.5);
        assert_eq!(smoothed, -67.5);
        assert!(filter.is_initialized());
        assert_eq!(filter.estimate(), Some(-67.5));
    }

    #[test]
    fn test_second_update_follows_gain_equation() {
        let mut filter = SignalKalmanFilter::new();
        filter.update(-60.0);
        let smoothed = filter.update(-62.0);

        // p_pred = 1.0 + 0.01; k = p_pred / (p_pred + 1.0)
        let predicted_covariance: f64 = 1.01;
        let gain = predicted_covariance / (predicted_covariance + 1.0);
        let expected = -60.0 + gain * (-62.0 - -60.0);
        assert!((smoothed - expected).abs() < 1e-12);
    }

    #[test]
    fn test_identical_sequences_produce_identical_outputs() {
        let readings = [-58.0, -61.0, -59.5, -63.0, -60.0, -60.0, -57.5];
        let mut a = SignalKalmanFilter::new();
        let mut b = SignalKalmanFilter::new();

        for reading in readings {
            assert_eq!(a.update(reading), b.update(reading));
        }
    }

    #[test]
    fn test_converges_toward_constant_input() {
        let mut filter = SignalKalmanFilter::new();
        filter.update(-80.0);

        let mut estimate = -80.0;
        for _ in 0..50 {
            estimate = filter.update(-55.0);
        }
        assert!((estimate - -55.0).abs() < 0.5);
    }

    #[test]
    fn test_smoothing_dampens_outliers() {
        let mut filter = SignalKalmanFilter::new();
        filter.update(-60.0);
        filter.update(-60.0);
        let smoothed = filter.update(-90.0);

        // A single outlier moves the estimate only partway
        assert!(smoothed > -80.0);
        assert!(smoothed < -60.0);
    }

    #[test]
    fn test_reset_returns_to_lazy_state() {
        let mut filter = SignalKalmanFilter::new();
        filter.update(-60.0);
        filter.update(-65.0);

        filter.reset();
        assert!(!filter.is_initialized());
        assert_eq!(filter.update(-70.0), -70.0);
    }

    #[test]
    fn test_custom_noise_parameters() {
        // Higher measurement noise means a smaller gain and slower tracking
        let mut trusting = SignalKalmanFilter::with_noise(0.01, 1.0);
        let mut skeptical = SignalKalmanFilter::with_noise(0.01, 4.0);
        trusting.update(-60.0);
        skeptical.update(-60.0);

        let t = trusting.update(-70.0);
        let s = skeptical.update(-70.0);
        assert!(t < s);
    }
}
