use crate::simulation::{Result, SignalError, SimConfig};

/// Parameters of one genetic optimization run
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    /// Candidates per generation, at least 2
    pub pop_size: usize,
    /// Generations evolved after the initial population
    pub generations: usize,
    /// Probability that an offspring gets one gene resampled
    pub mutation_rate: f64,
    /// Upper bound on the sum of green times sharing an intersection (s)
    pub cycle_limit: f64,
    /// Settings of every fitness simulation
    pub simulation: SimConfig,
    /// Master seed; a random one is drawn and logged when absent
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            pop_size: 30,
            generations: 5,
            mutation_rate: 0.05,
            cycle_limit: 120.0,
            simulation: SimConfig::default(),
            seed: None,
        }
    }
}

impl GaConfig {
    /// Short run sized for a live two-signal controller: one simulated hour
    /// over a 60 s cycle
    pub fn controller() -> Self {
        Self {
            pop_size: 20,
            generations: 5,
            cycle_limit: 60.0,
            simulation: SimConfig::with_horizon(3600.0),
            ..Self::default()
        }
    }

    pub fn horizon(&self) -> f64 {
        self.simulation.horizon
    }

    pub fn validate(&self) -> Result<()> {
        if self.pop_size < 2 {
            return Err(SignalError::InvalidConfig(format!(
                "population size must be at least 2, got {}",
                self.pop_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SignalError::InvalidConfig(format!(
                "mutation rate must lie in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !self.cycle_limit.is_finite() || self.cycle_limit <= 0.0 {
            return Err(SignalError::InvalidConfig(format!(
                "cycle limit must be positive, got {}",
                self.cycle_limit
            )));
        }
        self.simulation.validate()
    }
}
