//! Engine configuration with JSON file persistence

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::ranging::RangeModel;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the configuration is usable
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Non-fatal oddities
    pub warnings: Vec<String>,
}

/// Tunable parameters of the positioning engine
///
/// Every field has a default, so a partial JSON file configures only what
/// it names. The history capacity and the solver's beacon count are fixed
/// invariants, not configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Signal-strength-to-distance conversion parameters
    #[serde(default)]
    pub range: RangeModel,

    /// Smoothing filter process noise
    #[serde(default = "default_process_noise")]
    pub process_noise: f64,

    /// Smoothing filter measurement noise
    #[serde(default = "default_measurement_noise")]
    pub measurement_noise: f64,

    /// Staleness horizon in milliseconds; zero disables eviction
    #[serde(default = "default_expiry_ms")]
    pub expiry_ms: u64,

    /// Window in milliseconds within which a repeated identical strength
    /// only refreshes liveness
    #[serde(default = "default_min_append_interval_ms")]
    pub min_append_interval_ms: u64,
}

fn default_process_noise() -> f64 {
    0.01
}

fn default_measurement_noise() -> f64 {
    1.0
}

fn default_expiry_ms() -> u64 {
    5000
}

fn default_min_append_interval_ms() -> u64 {
    20
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            range: RangeModel::default(),
            process_noise: default_process_noise(),
            measurement_noise: default_measurement_noise(),
            expiry_ms: default_expiry_ms(),
            min_append_interval_ms: default_min_append_interval_ms(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        // Validate before handing the configuration out
        let validation = config.validate();
        for warning in &validation.warnings {
            warn!("Configuration warning: {}", warning);
        }
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        info!("Loaded configuration from '{}'", path_str);
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        info!("Saved configuration to '{}'", path_str);
        Ok(())
    }

    /// Check every parameter, collecting errors and warnings
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !self.range.reference_strength_dbm.is_finite() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "range.reference_strength_dbm".to_string(),
                value: self.range.reference_strength_dbm.to_string(),
                reason: "Reference strength must be finite".to_string(),
            });
        } else if self.range.reference_strength_dbm > 0.0 {
            warnings.push(format!(
                "Reference strength {} dBm is positive; received BLE power is normally negative",
                self.range.reference_strength_dbm
            ));
        }

        if !self.range.path_loss_exponent.is_finite() || self.range.path_loss_exponent <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "range.path_loss_exponent".to_string(),
                value: self.range.path_loss_exponent.to_string(),
                reason: "Path loss exponent must be positive".to_string(),
            });
        }

        if !self.range.min_distance_m.is_finite() || self.range.min_distance_m < 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "range.min_distance_m".to_string(),
                value: self.range.min_distance_m.to_string(),
                reason: "Minimum distance must be zero or positive".to_string(),
            });
        }

        if !self.range.max_distance_m.is_finite()
            || self.range.max_distance_m <= self.range.min_distance_m
        {
            errors.push(ConfigError::InvalidParameter {
                parameter: "range.max_distance_m".to_string(),
                value: self.range.max_distance_m.to_string(),
                reason: "Maximum distance must exceed the minimum distance".to_string(),
            });
        }

        if !self.process_noise.is_finite() || self.process_noise < 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "process_noise".to_string(),
                value: self.process_noise.to_string(),
                reason: "Process noise must be zero or positive".to_string(),
            });
        }

        if !self.measurement_noise.is_finite() || self.measurement_noise <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "measurement_noise".to_string(),
                value: self.measurement_noise.to_string(),
                reason: "Measurement noise must be positive".to_string(),
            });
        }

        if self.expiry_ms > 0 && self.expiry_ms < 100 {
            warnings.push(format!(
                "Staleness horizon {} ms is shorter than a typical advertising interval",
                self.expiry_ms
            ));
        }

        if self.min_append_interval_ms > 1000 {
            warnings.push(format!(
                "Dedup window {} ms is unusually long and may drop real readings",
                self.min_append_interval_ms
            ));
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Staleness horizon as a `Duration`
    pub fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms)
    }

    /// Dedup window as a `Duration`
    pub fn min_append_interval(&self) -> Duration {
        Duration::from_millis(self.min_append_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.range.reference_strength_dbm, -40.0);
        assert_eq!(config.range.path_loss_exponent, 2.5);
        assert_eq!(config.range.max_distance_m, 10.0);
        assert_eq!(config.process_noise, 0.01);
        assert_eq!(config.measurement_noise, 1.0);
        assert_eq!(config.expiry_ms, 5000);
        assert_eq!(config.min_append_interval_ms, 20);
        assert!(config.validate().is_valid);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"expiry_ms": 8000}"#).expect("partial config should parse");
        assert_eq!(config.expiry_ms, 8000);
        assert_eq!(config.min_append_interval_ms, 20);
        assert_eq!(config.range.path_loss_exponent, 2.5);
    }

    #[test]
    fn test_validate_rejects_bad_exponent() {
        let mut config = EngineConfig::default();
        config.range.path_loss_exponent = 0.0;

        let result = config.validate();
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.to_string().contains("path_loss_exponent")));
    }

    #[test]
    fn test_validate_rejects_inverted_distance_bounds() {
        let mut config = EngineConfig::default();
        config.range.min_distance_m = 5.0;
        config.range.max_distance_m = 2.0;
        assert!(!config.validate().is_valid);
    }

    #[test]
    fn test_validate_rejects_non_positive_measurement_noise() {
        let mut config = EngineConfig::default();
        config.measurement_noise = 0.0;
        assert!(!config.validate().is_valid);

        config.measurement_noise = -1.0;
        assert!(!config.validate().is_valid);
    }

    #[test]
    fn test_validate_warns_on_long_dedup_window() {
        let mut config = EngineConfig::default();
        config.min_append_interval_ms = 5000;

        let result = config.validate();
        assert!(result.is_valid);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_zero_expiry_is_valid() {
        let mut config = EngineConfig::default();
        config.expiry_ms = 0;

        let result = config.validate();
        assert!(result.is_valid);
        assert_eq!(config.expiry(), Duration::ZERO);
    }

    #[test]
    fn test_file_round_trip() {
        let mut config = EngineConfig::default();
        config.range.reference_strength_dbm = -52.5;
        config.expiry_ms = 12000;

        let temp_path = std::env::temp_dir().join("beacon_positioning_test_config.json");
        config.save_to_file(&temp_path).unwrap();
        let loaded = EngineConfig::from_file(&temp_path).unwrap();

        assert_eq!(loaded.range.reference_strength_dbm, -52.5);
        assert_eq!(loaded.expiry_ms, 12000);
        assert_eq!(loaded.min_append_interval_ms, 20);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_from_file_rejects_invalid_config() {
        let temp_path = std::env::temp_dir().join("beacon_positioning_bad_config.json");
        fs::write(&temp_path, r#"{"range": {"path_loss_exponent": -2.0}}"#).unwrap();

        let result = EngineConfig::from_file(&temp_path);
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let result = EngineConfig::from_file("/nonexistent/beacon_positioning.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
