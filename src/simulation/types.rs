//! Core types for the signal timing simulation
//!
//! Identifiers, event records, and the tuning constants shared by the simulator
//! and the optimizer.

/// Index of a lane within one network
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(pub usize);

/// Kind of a scheduled simulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A vehicle joins the back of the lane queue
    Arrival,
    /// The vehicle at the head of the lane finishes crossing
    Release,
}

/// A single vehicle passing the stop line, kept when departure recording is on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    /// Time the vehicle joined the queue
    pub arrival: f64,
    /// Time the vehicle cleared the intersection
    pub release: f64,
    /// Recorded waiting time
    pub wait: f64,
}

/// Default reaction time of a stopped driver once the light turns green (s)
pub const DEFAULT_REACTION_TIME: f64 = 4.1;

/// Default time for a vehicle to clear the intersection once moving (s)
pub const DEFAULT_CROSSING_TIME: f64 = 3.4;

/// Default simulated horizon: one day (s)
pub const DEFAULT_HORIZON: f64 = 24.0 * 3600.0;

/// Upper bound on processed events for a single run
pub const DEFAULT_MAX_EVENTS: u64 = 10_000_000;

/// Substituted for `1 - U` when the uniform draw rounds up to 1
pub const SAMPLING_FLOOR: f64 = 1e-12;

/// Lower bound of the green-time gene range (s)
pub const GENE_MIN: f64 = 5.0;

/// Upper bound of the green-time gene range (s)
pub const GENE_MAX: f64 = 30.0;

/// Candidates carried unchanged into every new generation
pub const ELITE_COUNT: usize = 2;

/// Minimum red time when deriving a light from a candidate green time (s)
pub const MIN_RED_TIME: f64 = 1.0;

/// Slack allowed when summing movement probabilities leaving one lane
pub const PROBABILITY_EPSILON: f64 = 1e-9;
