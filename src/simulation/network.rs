//! Network descriptors and their validation
//!
//! A [`NetworkDescriptor`] is the loose input form (usually parsed from JSON).
//! [`build_network`] checks it and produces an immutable [`Network`] from which
//! every simulation run builds its own lane state.

use log::warn;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{Result, SignalError};
use super::lane::LaneSpec;
use super::light::Light;
use super::types::{LaneId, PROBABILITY_EPSILON};

fn default_phase() -> f64 {
    30.0
}

fn default_probability() -> f64 {
    1.0
}

/// One lane record of a network descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub mean_interarrival: Option<f64>,
    #[serde(default = "default_phase")]
    pub green: f64,
    #[serde(default = "default_phase")]
    pub red: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub intersection: Option<String>,
}

impl LaneRecord {
    pub fn new(id: impl Into<String>, mean_interarrival: Option<f64>, green: f64, red: f64) -> Self {
        Self {
            id: id.into(),
            mean_interarrival,
            green,
            red,
            offset: 0.0,
            intersection: None,
        }
    }
}

/// A turning movement between two lanes. Validated but not simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub origin: String,
    pub destination: String,
    #[serde(default = "default_probability")]
    pub probability: f64,
}

/// Travel time between two lanes. Validated but not simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    pub from: String,
    pub to: String,
    pub travel_time: f64,
}

/// Input form of a network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub lanes: Vec<LaneRecord>,
    #[serde(default)]
    pub movements: Vec<Movement>,
    #[serde(default)]
    pub displacements: Vec<Displacement>,
}

impl NetworkDescriptor {
    /// Two approaches sharing one intersection, with asymmetric demand
    pub fn two_lane_demo() -> Self {
        Self {
            lanes: vec![
                LaneRecord::new("v1", Some(8.8), 33.0, 22.0),
                LaneRecord::new("v2", Some(18.5), 22.0, 33.0),
            ],
            movements: Vec::new(),
            displacements: Vec::new(),
        }
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Edge weight of the movement graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementEdge {
    pub probability: f64,
}

/// A validated, immutable network
#[derive(Debug, Clone)]
pub struct Network {
    lanes: Vec<LaneSpec>,
    index: HashMap<String, LaneId>,
    movement_graph: DiGraph<LaneId, MovementEdge>,
    displacements: HashMap<(LaneId, LaneId), f64>,
}

impl Network {
    pub fn lanes(&self) -> &[LaneSpec] {
        &self.lanes
    }

    pub fn lane(&self, id: LaneId) -> Option<&LaneSpec> {
        self.lanes.get(id.0)
    }

    pub fn lane_id(&self, name: &str) -> Option<LaneId> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Lane-to-lane turning movements, one node per lane in lane order
    pub fn movement_graph(&self) -> &DiGraph<LaneId, MovementEdge> {
        &self.movement_graph
    }

    pub fn travel_time(&self, from: LaneId, to: LaneId) -> Option<f64> {
        self.displacements.get(&(from, to)).copied()
    }

    /// The parts of the network the optimizer varies over
    pub fn topology(&self) -> LaneTopology {
        LaneTopology {
            lanes: self
                .lanes
                .iter()
                .map(|lane| TopologyLane {
                    name: lane.name.clone(),
                    mean_interarrival: lane.mean_interarrival,
                    intersection: lane.intersection.clone(),
                })
                .collect(),
        }
    }

    /// Assemble a network from already-checked lanes, without movements
    pub(crate) fn from_specs(lanes: Vec<LaneSpec>) -> Self {
        let mut movement_graph = DiGraph::new();
        let index = lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| {
                movement_graph.add_node(LaneId(i));
                (lane.name.clone(), LaneId(i))
            })
            .collect();
        Self {
            lanes,
            index,
            movement_graph,
            displacements: HashMap::new(),
        }
    }
}

/// One lane as seen by the optimizer: demand and grouping, no light timing
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyLane {
    pub name: String,
    pub mean_interarrival: Option<f64>,
    pub intersection: Option<String>,
}

/// Lane demand of a network, independent of any light timing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaneTopology {
    pub lanes: Vec<TopologyLane>,
}

impl LaneTopology {
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Indices of lanes sharing a cycle constraint
    ///
    /// Lanes without an intersection tag form one shared group. Groups appear in
    /// order of their first lane.
    pub fn constraint_groups(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<(Option<&str>, Vec<usize>)> = Vec::new();
        for (i, lane) in self.lanes.iter().enumerate() {
            let key = lane.intersection.as_deref();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(i),
                None => groups.push((key, vec![i])),
            }
        }
        groups.into_iter().map(|(_, members)| members).collect()
    }
}

fn invalid(message: impl Into<String>) -> SignalError {
    SignalError::InvalidDescriptor(message.into())
}

fn check_lane(record: &LaneRecord) -> Result<LaneSpec> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(invalid("lane record is missing an id"));
    }
    if !record.green.is_finite() || record.green <= 0.0 {
        return Err(invalid(format!(
            "lane '{}' has non-positive green time {}",
            id, record.green
        )));
    }
    if !record.red.is_finite() || record.red < 0.0 {
        return Err(invalid(format!(
            "lane '{}' has negative red time {}",
            id, record.red
        )));
    }
    if !record.offset.is_finite() {
        return Err(invalid(format!("lane '{}' has a non-finite offset", id)));
    }
    if let Some(mean) = record.mean_interarrival {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(invalid(format!(
                "lane '{}' has non-positive mean interarrival {}",
                id, mean
            )));
        }
    }

    Ok(LaneSpec {
        name: id.to_string(),
        light: Light::new(id, record.green, record.red, record.offset),
        mean_interarrival: record.mean_interarrival,
        intersection: record.intersection.clone(),
    })
}

fn resolve(index: &HashMap<String, LaneId>, name: &str, what: &str) -> Result<LaneId> {
    index
        .get(name.trim())
        .copied()
        .ok_or_else(|| invalid(format!("{} references unknown lane '{}'", what, name)))
}

/// Validate a descriptor and build the network it describes
pub fn build_network(descriptor: &NetworkDescriptor) -> Result<Network> {
    if descriptor.lanes.is_empty() {
        return Err(SignalError::DegenerateNetwork);
    }

    let mut lanes = Vec::with_capacity(descriptor.lanes.len());
    for record in &descriptor.lanes {
        let spec = check_lane(record)?;
        if lanes.iter().any(|lane: &LaneSpec| lane.name == spec.name) {
            return Err(invalid(format!("duplicate lane id '{}'", spec.name)));
        }
        if !spec.is_source() {
            warn!(
                "lane '{}' has no arrival source; movements are not simulated, so it stays empty",
                spec.name
            );
        }
        lanes.push(spec);
    }

    let mut network = Network::from_specs(lanes);

    for movement in &descriptor.movements {
        let origin = resolve(&network.index, &movement.origin, "movement")?;
        let destination = resolve(&network.index, &movement.destination, "movement")?;
        if !(0.0..=1.0).contains(&movement.probability) {
            return Err(invalid(format!(
                "movement {} -> {} has probability {} outside [0, 1]",
                movement.origin, movement.destination, movement.probability
            )));
        }
        network.movement_graph.add_edge(
            NodeIndex::new(origin.0),
            NodeIndex::new(destination.0),
            MovementEdge {
                probability: movement.probability,
            },
        );
    }

    for node in network.movement_graph.node_indices() {
        let outgoing: f64 = network
            .movement_graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.weight().probability)
            .sum();
        if outgoing > 1.0 + PROBABILITY_EPSILON {
            return Err(invalid(format!(
                "movements leaving lane '{}' sum to {}",
                network.lanes[node.index()].name,
                outgoing
            )));
        }
    }

    for displacement in &descriptor.displacements {
        let from = resolve(&network.index, &displacement.from, "displacement")?;
        let to = resolve(&network.index, &displacement.to, "displacement")?;
        if !displacement.travel_time.is_finite() || displacement.travel_time < 0.0 {
            return Err(invalid(format!(
                "displacement {} -> {} has invalid travel time {}",
                displacement.from, displacement.to, displacement.travel_time
            )));
        }
        network
            .displacements
            .insert((from, to), displacement.travel_time);
    }

    Ok(network)
}
