//! Traffic Signal Timing Library
//!
//! A discrete-event simulator for lanes gated by fixed-cycle traffic lights and
//! a genetic optimizer that searches for green times minimizing the worst
//! per-lane average wait.

pub mod optimizer;
pub mod simulation;
