//! Green-time optimization
//!
//! A genetic search whose fitness function is one full simulation run of the
//! candidate timing.

mod config;
mod constraint;
mod counts;
mod fitness;
mod genetic;

pub use config::GaConfig;
pub use constraint::CycleConstraint;
pub use counts::{
    interarrival_from_count, topology_from_counts, COUNT_WINDOW, IDLE_INTERARRIVAL,
    MIN_INTERARRIVAL,
};
pub use fitness::{Evaluation, FitnessEvaluator};
pub use genetic::{optimize, GeneticOptimizer, OptimizationResult, Population, Scored};
