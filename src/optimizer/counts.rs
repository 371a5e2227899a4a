//! Conversion from detected vehicle counts to lane demand

use crate::simulation::{LaneTopology, Result, SignalError, TopologyLane};

/// Mean interarrival assumed for a zone with no detected vehicles (s)
pub const IDLE_INTERARRIVAL: f64 = 30.0;

/// Observation window the counts are spread over (s)
pub const COUNT_WINDOW: f64 = 40.0;

/// Shortest mean interarrival derived from counts (s)
pub const MIN_INTERARRIVAL: f64 = 3.0;

/// Mean interarrival implied by `count` vehicles seen in one window
pub fn interarrival_from_count(count: u32) -> f64 {
    if count == 0 {
        IDLE_INTERARRIVAL
    } else {
        (COUNT_WINDOW / f64::from(count)).max(MIN_INTERARRIVAL)
    }
}

/// Build a single-intersection topology with one source lane per zone
pub fn topology_from_counts<S: AsRef<str>>(counts: &[(S, u32)]) -> Result<LaneTopology> {
    if counts.is_empty() {
        return Err(SignalError::DegenerateNetwork);
    }

    let mut lanes: Vec<TopologyLane> = Vec::with_capacity(counts.len());
    for (zone, count) in counts {
        let name = zone.as_ref().trim();
        if name.is_empty() {
            return Err(SignalError::InvalidDescriptor(
                "zone name is empty".to_string(),
            ));
        }
        if lanes.iter().any(|lane| lane.name == name) {
            return Err(SignalError::InvalidDescriptor(format!(
                "duplicate zone '{}'",
                name
            )));
        }
        lanes.push(TopologyLane {
            name: name.to_string(),
            mean_interarrival: Some(interarrival_from_count(*count)),
            intersection: None,
        });
    }

    Ok(LaneTopology { lanes })
}
