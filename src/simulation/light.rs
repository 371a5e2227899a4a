//! Fixed-time traffic light phase model
//!
//! A light is a pure function of simulated time. It holds no running state, so
//! the same light can be queried at any time in any order.

/// A fixed-cycle traffic light
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub id: String,
    /// Green duration per cycle (s)
    pub green: f64,
    /// Red duration per cycle (s)
    pub red: f64,
    /// Shift of the cycle start (s), any real value
    pub offset: f64,
}

impl Light {
    pub fn new(id: impl Into<String>, green: f64, red: f64, offset: f64) -> Self {
        Self {
            id: id.into(),
            green,
            red,
            offset,
        }
    }

    pub fn cycle(&self) -> f64 {
        self.green + self.red
    }

    /// Position of `t` inside the current cycle, in `[0, cycle)`
    ///
    /// Returns `None` when the cycle is not positive, i.e. the light never turns
    /// green.
    fn phase_position(&self, t: f64) -> Option<f64> {
        let cycle = self.cycle();
        if cycle.is_nan() || cycle <= 0.0 {
            return None;
        }
        let position = (t - self.offset).rem_euclid(cycle);
        // rem_euclid may round up to exactly `cycle`
        Some(if position >= cycle { 0.0 } else { position })
    }

    /// Check if the light shows green at time `t`
    pub fn is_green(&self, t: f64) -> bool {
        match self.phase_position(t) {
            Some(position) => position < self.green,
            None => false,
        }
    }

    /// Time until the light next turns green, or 0 if it is green at `t`
    ///
    /// A light with a non-positive cycle is permanently red and returns
    /// `f64::INFINITY`.
    pub fn time_to_next_green(&self, t: f64) -> f64 {
        match self.phase_position(t) {
            Some(position) if position < self.green => 0.0,
            Some(position) => self.cycle() - position,
            None => f64::INFINITY,
        }
    }
}
