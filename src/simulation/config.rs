use super::error::{Result, SignalError};
use super::types::{DEFAULT_CROSSING_TIME, DEFAULT_HORIZON, DEFAULT_MAX_EVENTS, DEFAULT_REACTION_TIME};

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Events scheduled strictly after this time are discarded (s)
    pub horizon: f64,
    /// Delay before a stopped vehicle starts moving on green (s)
    pub reaction_time: f64,
    /// Time to clear the intersection once moving; also the discharge headway (s)
    pub crossing_time: f64,
    /// Upper bound on processed events
    pub max_events: u64,
    /// Keep a per-lane log of every departure
    pub record_departures: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            reaction_time: DEFAULT_REACTION_TIME,
            crossing_time: DEFAULT_CROSSING_TIME,
            max_events: DEFAULT_MAX_EVENTS,
            record_departures: false,
        }
    }
}

impl SimConfig {
    pub fn with_horizon(horizon: f64) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SignalError::InvalidConfig(format!(
                "horizon must be positive, got {}",
                self.horizon
            )));
        }
        if !self.reaction_time.is_finite() || self.reaction_time < 0.0 {
            return Err(SignalError::InvalidConfig(format!(
                "reaction time must be non-negative, got {}",
                self.reaction_time
            )));
        }
        if !self.crossing_time.is_finite() || self.crossing_time < 0.0 {
            return Err(SignalError::InvalidConfig(format!(
                "crossing time must be non-negative, got {}",
                self.crossing_time
            )));
        }
        if self.max_events == 0 {
            return Err(SignalError::InvalidConfig(
                "event limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
