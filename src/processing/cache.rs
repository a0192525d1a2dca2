//! Live beacon observation store
//!
//! Keyed by beacon identity. Each record carries a bounded strength
//! history, a dedicated smoothing filter, and the current distance
//! estimate. Stale records leave through eviction; eviction is disabled
//! entirely when the expiry is zero.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::algorithms::ranging::RangeModel;
use crate::core::{BeaconPosition, HISTORY_CAPACITY};
use crate::processing::kalman::SignalKalmanFilter;

/// One beacon selected for trilateration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeaconCandidate {
    pub position: BeaconPosition,
    pub distance_m: f64,
}

/// Read-only reporting view of one live beacon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconReport {
    pub north_raw: f64,
    pub east_raw: f64,
    pub building_id: u32,
    pub floor: i32,
    /// Current filter output (dBm)
    pub smoothed_strength: f64,
    /// Raw strength samples, oldest first
    pub history: Vec<f64>,
    pub distance_m: f64,
}

/// Per-beacon state
#[derive(Debug, Clone)]
struct BeaconRecord {
    /// Raw strength samples, oldest first, at most `HISTORY_CAPACITY`
    history: VecDeque<f64>,
    filter: SignalKalmanFilter,
    smoothed_strength: f64,
    distance_m: f64,
    last_seen: Instant,
    /// When a sample last appended; anchors the dedup window
    last_accepted: Instant,
    /// Most recently accepted raw strength, compared for deduplication
    last_strength: f64,
    /// Arrival order, the tie-break for equal distances
    arrival_seq: u64,
}

/// Store of live beacons observed by the receiver
pub struct BeaconCache {
    records: HashMap<BeaconPosition, BeaconRecord>,
    range_model: RangeModel,
    /// Filter process noise for new records
    process_noise: f64,
    /// Filter measurement noise for new records
    measurement_noise: f64,
    /// Staleness horizon; zero disables eviction
    expiry: Duration,
    /// Window after an acceptance within which an identical strength only
    /// refreshes `last_seen`
    min_append_interval: Duration,
    arrival_counter: u64,
    accepted_count: usize,
    deduplicated_count: usize,
}

impl Default for BeaconCache {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            range_model: RangeModel::default(),
            process_noise: 0.01,
            measurement_noise: 1.0,
            expiry: Duration::from_secs(5), // 5 second default staleness horizon
            min_append_interval: Duration::from_millis(20),
            arrival_counter: 0,
            accepted_count: 0,
            deduplicated_count: 0,
        }
    }
}

impl BeaconCache {
    /// Create a store with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with explicit settings
    pub fn with_settings(
        range_model: RangeModel,
        process_noise: f64,
        measurement_noise: f64,
        expiry: Duration,
        min_append_interval: Duration,
    ) -> Self {
        Self {
            range_model,
            process_noise,
            measurement_noise,
            expiry,
            min_append_interval,
            ..Self::default()
        }
    }

    /// Record one observation of a beacon
    pub fn record(&mut self, position: BeaconPosition, strength_dbm: f64) {
        self.record_at(position, strength_dbm, Instant::now());
    }

    fn record_at(&mut self, position: BeaconPosition, strength_dbm: f64, now: Instant) {
        if let Some(record) = self.records.get_mut(&position) {
            // A bit-identical strength inside the dedup window is the same
            // advertisement seen again: refresh liveness, nothing else.
            // The window is measured from the last acceptance, so only an
            // accepted sample moves it.
            if strength_dbm == record.last_strength
                && now.duration_since(record.last_accepted) < self.min_append_interval
            {
                record.last_seen = now;
                self.deduplicated_count += 1;
                return;
            }

            record.history.push_back(strength_dbm);
            if record.history.len() > HISTORY_CAPACITY {
                record.history.pop_front();
            }
            record.smoothed_strength = record.filter.update(strength_dbm);
            record.distance_m = self.range_model.distance_m(record.smoothed_strength);
            record.last_seen = now;
            record.last_accepted = now;
            record.last_strength = strength_dbm;
            self.accepted_count += 1;
        } else {
            let arrival_seq = self.arrival_counter;
            self.arrival_counter += 1;

            let mut filter =
                SignalKalmanFilter::with_noise(self.process_noise, self.measurement_noise);
            let smoothed_strength = filter.update(strength_dbm);
            let distance_m = self.range_model.distance_m(smoothed_strength);

            let mut history = VecDeque::with_capacity(HISTORY_CAPACITY + 1);
            history.push_back(strength_dbm);

            self.records.insert(
                position,
                BeaconRecord {
                    history,
                    filter,
                    smoothed_strength,
                    distance_m,
                    last_seen: now,
                    last_accepted: now,
                    last_strength: strength_dbm,
                    arrival_seq,
                },
            );
            self.accepted_count += 1;
        }
    }

    /// Remove beacons not seen within the staleness horizon, returning how
    /// many were dropped. A zero horizon disables eviction.
    pub fn evict(&mut self) -> usize {
        self.evict_at(Instant::now())
    }

    fn evict_at(&mut self, now: Instant) -> usize {
        if self.expiry.is_zero() {
            return 0;
        }

        // Collect first so removal never invalidates iteration
        let expired: Vec<BeaconPosition> = self
            .records
            .iter()
            .filter(|(_, record)| now.duration_since(record.last_seen) > self.expiry)
            .map(|(position, _)| *position)
            .collect();

        for position in &expired {
            self.records.remove(position);
        }
        expired.len()
    }

    /// The `count` nearest live beacons by estimated distance, absent slots
    /// explicitly `None`. Equal distances keep first-observed order.
    pub fn best(&self, count: usize) -> Vec<Option<BeaconCandidate>> {
        let mut live: Vec<(&BeaconPosition, &BeaconRecord)> = self.records.iter().collect();
        live.sort_by(|a, b| {
            a.1.distance_m
                .total_cmp(&b.1.distance_m)
                .then(a.1.arrival_seq.cmp(&b.1.arrival_seq))
        });

        (0..count)
            .map(|i| {
                live.get(i).map(|(position, record)| BeaconCandidate {
                    position: **position,
                    distance_m: record.distance_m,
                })
            })
            .collect()
    }

    /// Reporting view of every live beacon, nearest first. Never mutates
    /// the store.
    pub fn snapshot(&self) -> Vec<BeaconReport> {
        let mut live: Vec<(&BeaconPosition, &BeaconRecord)> = self.records.iter().collect();
        live.sort_by(|a, b| {
            a.1.distance_m
                .total_cmp(&b.1.distance_m)
                .then(a.1.arrival_seq.cmp(&b.1.arrival_seq))
        });

        live.into_iter()
            .map(|(position, record)| BeaconReport {
                north_raw: position.north_raw(),
                east_raw: position.east_raw(),
                building_id: position.building_id(),
                floor: position.floor(),
                smoothed_strength: record.smoothed_strength,
                history: record.history.iter().copied().collect(),
                distance_m: record.distance_m,
            })
            .collect()
    }

    /// Number of live beacons
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, position: &BeaconPosition) -> bool {
        self.records.contains_key(position)
    }

    /// Get (accepted, deduplicated) observation counts
    pub fn get_statistics(&self) -> (usize, usize) {
        (self.accepted_count, self.deduplicated_count)
    }

    /// Drop every record and reset the statistics
    pub fn clear(&mut self) {
        self.records.clear();
        self.arrival_counter = 0;
        self.accepted_count = 0;
        self.deduplicated_count = 0;
    }
}
