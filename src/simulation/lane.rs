//! Lane state for a single simulation run

use rand::Rng;
use std::collections::VecDeque;

use super::light::Light;
use super::types::{LaneId, SAMPLING_FLOOR};

/// Immutable description of a lane, shared by every run built from a network
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSpec {
    pub name: String,
    pub light: Light,
    /// Mean time between spontaneous arrivals (s); `None` for non-source lanes
    pub mean_interarrival: Option<f64>,
    /// Intersection the lane belongs to, used to group the cycle constraint
    pub intersection: Option<String>,
}

impl LaneSpec {
    pub fn is_source(&self) -> bool {
        self.mean_interarrival.is_some()
    }
}

/// A lane during one run: its light plus the FIFO queue of waiting vehicles
#[derive(Debug, Clone)]
pub struct SimLane {
    pub id: LaneId,
    pub light: Light,
    pub mean_interarrival: Option<f64>,
    /// Arrival timestamps of queued vehicles, oldest first
    queue: VecDeque<f64>,
}

impl SimLane {
    pub fn from_spec(id: LaneId, spec: &LaneSpec) -> Self {
        Self {
            id,
            light: spec.light.clone(),
            mean_interarrival: spec.mean_interarrival,
            queue: VecDeque::new(),
        }
    }

    /// Append a vehicle and return the new queue length
    pub fn enqueue(&mut self, arrival: f64) -> usize {
        self.queue.push_back(arrival);
        self.queue.len()
    }

    /// Remove the earliest-arrived vehicle
    pub fn pop_head(&mut self) -> Option<f64> {
        self.queue.pop_front()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Draw an exponential interarrival time with the given mean
pub fn sample_interarrival<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> f64 {
    exponential_from_uniform(mean, rng.random())
}

/// Inverse-transform an exponential sample from a uniform draw `u` in `[0, 1)`
///
/// A draw that rounds to 1 falls back to [`SAMPLING_FLOOR`] so the logarithm
/// stays finite.
pub fn exponential_from_uniform(mean: f64, u: f64) -> f64 {
    let tail = if u < 1.0 { 1.0 - u } else { SAMPLING_FLOOR };
    -mean * tail.ln()
}
