//! Engine facade with callback-based position delivery
//!
//! One caller owns the engine and drives it: observations in through
//! `record`, positions out through `poll` or `solve_position`. Registered
//! callbacks fire on every successful solve in addition to the returned
//! value, so an observer is optional and decoupled from construction.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::Serialize;

use crate::algorithms::trilateration::TrilaterationSolver;
use crate::api::types::PositionReport;
use crate::core::{BeaconPosition, ComputedPosition, Observation};
use crate::processing::cache::{BeaconCache, BeaconReport};
use crate::utils::config::{ConfigError, EngineConfig};
use crate::validation::error::PositioningError;

/// Callback function type for computed positions
pub type PositionCallback = Box<dyn Fn(&ComputedPosition) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Lifetime counters for intake and solving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStatistics {
    pub observations_accepted: usize,
    pub observations_rejected: usize,
    pub solve_attempts: usize,
    pub solve_successes: usize,
}

/// Positioning engine owning the observation store and the solver
pub struct PositioningEngine {
    cache: BeaconCache,
    solver: TrilaterationSolver,
    config: EngineConfig,
    /// Callback handle counter
    callback_counter: u32,
    /// Position callbacks
    position_callbacks: HashMap<CallbackHandle, PositionCallback>,
    observations_accepted: usize,
    observations_rejected: usize,
    solve_attempts: usize,
    solve_successes: usize,
}

impl PositioningEngine {
    /// Create an engine from a configuration
    ///
    /// The configuration is validated first and the first validation error
    /// is returned, so a store is never built over malformed parameters.
    /// Configurations loaded through `EngineConfig::from_file` are already
    /// valid; this guards hand-built ones.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let validation = config.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        let cache = BeaconCache::with_settings(
            config.range,
            config.process_noise,
            config.measurement_noise,
            config.expiry(),
            config.min_append_interval(),
        );
        info!(
            "Positioning engine initialized: expiry {} ms, dedup window {} ms",
            config.expiry_ms, config.min_append_interval_ms
        );
        Ok(Self {
            cache,
            solver: TrilaterationSolver::new(),
            config,
            callback_counter: 0,
            position_callbacks: HashMap::new(),
            observations_accepted: 0,
            observations_rejected: 0,
            solve_attempts: 0,
            solve_successes: 0,
        })
    }

    /// Record one decoded observation
    ///
    /// A non-finite coordinate or strength is dropped here and never
    /// reaches the store; recording stays O(1) and never solves.
    pub fn record(&mut self, observation: Observation) -> Result<(), PositioningError> {
        if !observation.strength_dbm.is_finite() {
            self.observations_rejected += 1;
            warn!(
                "Dropping observation of beacon ({}, {}) with non-finite strength",
                observation.north_raw, observation.east_raw
            );
            return Err(PositioningError::MalformedObservation {
                reason: "non-finite signal strength".to_string(),
            });
        }

        match BeaconPosition::new(
            observation.building_id,
            observation.floor,
            observation.north_raw,
            observation.east_raw,
        ) {
            Some(position) => {
                self.cache.record(position, observation.strength_dbm);
                self.observations_accepted += 1;
                Ok(())
            }
            None => {
                self.observations_rejected += 1;
                warn!("Dropping observation with non-finite beacon coordinates");
                Err(PositioningError::MalformedObservation {
                    reason: "non-finite beacon coordinates".to_string(),
                })
            }
        }
    }

    /// Evict stale beacons, solve once, and deliver the result
    ///
    /// Registered callbacks are invoked with the position before it is
    /// returned. No retries: a failed solve reports why and leaves the
    /// caller to poll again.
    pub fn solve_position(&mut self) -> Result<ComputedPosition, PositioningError> {
        let evicted = self.cache.evict();
        if evicted > 0 {
            debug!("Evicted {} stale beacon(s)", evicted);
        }

        self.solve_attempts += 1;
        match self.solver.solve(&self.cache) {
            Ok(position) => {
                self.solve_successes += 1;
                self.trigger_position_callbacks(&position);
                Ok(position)
            }
            Err(error) => {
                debug!("Position solve failed: {}", error);
                Err(error)
            }
        }
    }

    /// Solve and map the outcome to the outward report
    ///
    /// Every failure degrades to the zero report; polling never panics
    /// and never returns a partial result.
    pub fn poll(&mut self) -> PositionReport {
        match self.solve_position() {
            Ok(position) => PositionReport::from(position),
            Err(_) => PositionReport::default(),
        }
    }

    /// Reporting view of every live beacon, nearest first
    pub fn snapshot(&self) -> Vec<BeaconReport> {
        self.cache.snapshot()
    }

    /// Number of live beacons in the store
    pub fn beacon_count(&self) -> usize {
        self.cache.len()
    }

    /// The configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a callback invoked on every successful solve
    pub fn register_position_callback(&mut self, callback: PositionCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.position_callbacks.insert(handle, callback);
        handle
    }

    /// Remove a previously registered callback
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> Result<(), PositioningError> {
        if self.position_callbacks.remove(&handle).is_some() {
            Ok(())
        } else {
            Err(PositioningError::UnknownCallbackHandle {
                handle_id: handle.id(),
            })
        }
    }

    /// Get lifetime intake and solve counters
    pub fn get_statistics(&self) -> EngineStatistics {
        EngineStatistics {
            observations_accepted: self.observations_accepted,
            observations_rejected: self.observations_rejected,
            solve_attempts: self.solve_attempts,
            solve_successes: self.solve_successes,
        }
    }

    fn trigger_position_callbacks(&self, position: &ComputedPosition) {
        for callback in self.position_callbacks.values() {
            callback(position);
        }
    }
}
