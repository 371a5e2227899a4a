//! Discrete-event traffic-light simulation
//!
//! Networks of lanes, each gated by a fixed-cycle light, simulated from
//! stochastic arrivals up to a time horizon. Every run builds its own lane state
//! from an immutable [`Network`], so runs never share mutable data.

mod config;
mod error;
mod events;
mod lane;
mod light;
mod network;
mod simulator;
mod types;

// Re-export public types for external use
pub use config::SimConfig;
pub use error::{Result, SignalError};
pub use events::{Event, EventQueue};
pub use lane::{exponential_from_uniform, sample_interarrival, LaneSpec, SimLane};
pub use light::Light;
pub use network::{
    build_network, Displacement, LaneRecord, LaneTopology, Movement, MovementEdge, Network,
    NetworkDescriptor, TopologyLane,
};
pub use simulator::{simulate, SimulationReport, Simulator};
pub use types::{
    Departure, EventKind, LaneId, DEFAULT_CROSSING_TIME, DEFAULT_HORIZON, DEFAULT_MAX_EVENTS,
    DEFAULT_REACTION_TIME, ELITE_COUNT, GENE_MAX, GENE_MIN, MIN_RED_TIME, PROBABILITY_EPSILON,
    SAMPLING_FLOOR,
};
