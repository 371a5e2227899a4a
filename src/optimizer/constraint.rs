//! Cycle-limit constraint on green-time vectors

use crate::simulation::LaneTopology;

/// Caps the summed green time of every intersection group at `limit`
#[derive(Debug, Clone, PartialEq)]
pub struct CycleConstraint {
    groups: Vec<Vec<usize>>,
    limit: f64,
}

impl CycleConstraint {
    pub fn new(topology: &LaneTopology, limit: f64) -> Self {
        Self {
            groups: topology.constraint_groups(),
            limit,
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Scale down every group whose sum exceeds the limit
    pub fn enforce(&self, genes: &mut [f64]) {
        for group in &self.groups {
            let sum: f64 = group.iter().map(|&i| genes[i]).sum();
            if sum > self.limit {
                let factor = self.limit / sum;
                for &i in group {
                    genes[i] *= factor;
                }
            }
        }
    }

    pub fn is_satisfied(&self, genes: &[f64], epsilon: f64) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().map(|&i| genes[i]).sum::<f64>() <= self.limit + epsilon)
    }
}
