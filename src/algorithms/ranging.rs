//! Signal strength to distance conversion

use serde::{Deserialize, Serialize};

/// Log-distance path loss model converting a smoothed signal strength into
/// an estimated range from the beacon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeModel {
    /// Reference signal strength at 1 meter distance (dBm)
    #[serde(default = "default_reference_strength_dbm")]
    pub reference_strength_dbm: f64,

    /// Path loss exponent (2.0 = free space, 2.5-4.0 = indoor)
    #[serde(default = "default_path_loss_exponent")]
    pub path_loss_exponent: f64,

    /// Lower clamp on the estimated distance (m)
    #[serde(default = "default_min_distance_m")]
    pub min_distance_m: f64,

    /// Upper clamp on the estimated distance (m)
    #[serde(default = "default_max_distance_m")]
    pub max_distance_m: f64,
}

fn default_reference_strength_dbm() -> f64 {
    -40.0
}

fn default_path_loss_exponent() -> f64 {
    2.5
}

fn default_min_distance_m() -> f64 {
    0.0
}

fn default_max_distance_m() -> f64 {
    10.0
}

impl Default for RangeModel {
    fn default() -> Self {
        Self {
            reference_strength_dbm: default_reference_strength_dbm(),
            path_loss_exponent: default_path_loss_exponent(),
            min_distance_m: default_min_distance_m(),
            max_distance_m: default_max_distance_m(),
        }
    }
}

impl RangeModel {
    /// Estimate distance from a smoothed signal strength
    ///
    /// Formula: distance = 10^((reference_strength - strength) / (10 * path_loss_exponent)),
    /// clamped to [min_distance_m, max_distance_m].
    pub fn distance_m(&self, strength_dbm: f64) -> f64 {
        let exponent =
            (self.reference_strength_dbm - strength_dbm) / (10.0 * self.path_loss_exponent);
        10.0_f64.powf(exponent).clamp(self.min_distance_m, self.max_distance_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_strength_maps_to_one_meter() {
        let model = RangeModel::default();
        let d = model.distance_m(model.reference_strength_dbm);
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_monotonic_in_strength() {
        let model = RangeModel::default();
        let mut previous = model.distance_m(-20.0);
        let mut strength = -20.0;
        while strength > -120.0 {
            strength -= 2.5;
            let d = model.distance_m(strength);
            assert!(d >= previous, "weaker signal {} gave shorter distance", strength);
            previous = d;
        }
    }

    #[test]
    fn test_distance_stays_within_clamp_bounds() {
        let model = RangeModel::default();
        for strength in [-200.0, -120.0, -60.0, -40.0, -10.0, 30.0] {
            let d = model.distance_m(strength);
            assert!(d >= model.min_distance_m);
            assert!(d <= model.max_distance_m);
        }
        // Far beyond the horizon the clamp binds exactly
        assert_eq!(model.distance_m(-200.0), model.max_distance_m);
    }

    #[test]
    fn test_lower_clamp_binds_for_very_strong_signals() {
        let model = RangeModel {
            min_distance_m: 0.5,
            ..RangeModel::default()
        };
        assert_eq!(model.distance_m(0.0), 0.5);
    }

    #[test]
    fn test_missing_json_fields_take_defaults() {
        let model: RangeModel = serde_json::from_str(r#"{"reference_strength_dbm": -59.0}"#)
            .expect("partial model should deserialize");
        assert_eq!(model.reference_strength_dbm, -59.0);
        assert_eq!(model.path_loss_exponent, 2.5);
        assert_eq!(model.max_distance_m, 10.0);
    }
}
