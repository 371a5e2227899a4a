//! Fitness of a green-time vector: worst per-lane average wait of one run

use log::debug;
use rand::Rng;
use std::collections::BTreeMap;

use crate::simulation::{
    simulate, LaneSpec, LaneTopology, Light, Network, Result, SignalError, SimConfig,
    MIN_RED_TIME,
};

/// Result of one fitness evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Worst per-lane average wait; lower is better
    pub fitness: f64,
    pub lane_waits: BTreeMap<String, f64>,
}

/// Turns green-time vectors into simulated networks and scores them
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    topology: &'a LaneTopology,
    simulation: &'a SimConfig,
    cycle_limit: f64,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(topology: &'a LaneTopology, simulation: &'a SimConfig, cycle_limit: f64) -> Self {
        Self {
            topology,
            simulation,
            cycle_limit,
        }
    }

    /// Build the transient network for `genes`, in topology lane order
    pub fn network_for(&self, genes: &[f64]) -> Result<Network> {
        if self.topology.is_empty() {
            return Err(SignalError::DegenerateNetwork);
        }
        if genes.len() != self.topology.len() {
            return Err(SignalError::InvalidConfig(format!(
                "candidate has {} genes for {} lanes",
                genes.len(),
                self.topology.len()
            )));
        }

        let lanes = self
            .topology
            .lanes
            .iter()
            .zip(genes)
            .map(|(lane, &green)| {
                let red = (self.cycle_limit - green).max(MIN_RED_TIME);
                LaneSpec {
                    name: lane.name.clone(),
                    light: Light::new(lane.name.clone(), green, red, 0.0),
                    mean_interarrival: lane.mean_interarrival,
                    intersection: lane.intersection.clone(),
                }
            })
            .collect();

        Ok(Network::from_specs(lanes))
    }

    pub fn evaluate<R: Rng + ?Sized>(&self, genes: &[f64], rng: &mut R) -> Result<Evaluation> {
        let network = self.network_for(genes)?;
        let report = simulate(&network, self.simulation, rng)?;
        let fitness = report
            .worst_wait()
            .ok_or(SignalError::DegenerateNetwork)?;

        debug!("evaluated {:?} -> fitness {:.3}", genes, fitness);

        Ok(Evaluation {
            fitness,
            lane_waits: report.avg_wait,
        })
    }
}
