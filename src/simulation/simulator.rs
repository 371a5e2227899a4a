//! Discrete-event simulator
//!
//! Advances simulated time through vehicle arrivals and light-gated releases.
//! Each lane holds exactly one pending Release while its queue is non-empty:
//! the first vehicle of an empty lane schedules it, and every Release schedules
//! the next one while vehicles remain. A vehicle's wait is recorded only when
//! its own Release fires.

use log::debug;
use rand::Rng;
use std::collections::BTreeMap;

use super::config::SimConfig;
use super::error::{Result, SignalError};
use super::events::EventQueue;
use super::lane::{sample_interarrival, SimLane};
use super::network::Network;
use super::types::{Departure, EventKind, LaneId};

/// Per-lane accumulators of one run
#[derive(Debug, Clone, Default)]
struct LaneStats {
    waits: Vec<f64>,
    passed: u64,
    departures: Vec<Departure>,
}

impl LaneStats {
    fn average_wait(&self) -> f64 {
        if self.waits.is_empty() {
            0.0
        } else {
            self.waits.iter().sum::<f64>() / self.waits.len() as f64
        }
    }
}

/// Outcome of one simulation run, keyed by lane name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationReport {
    /// Mean recorded wait per lane, 0.0 for lanes where nobody passed
    pub avg_wait: BTreeMap<String, f64>,
    /// Vehicles that cleared the intersection per lane
    pub passed: BTreeMap<String, u64>,
    /// Vehicles still queued when the run stopped
    pub queued: BTreeMap<String, usize>,
    pub events_processed: u64,
    /// Departures in release order; empty unless recording was enabled
    pub departures: BTreeMap<String, Vec<Departure>>,
}

impl SimulationReport {
    /// Largest per-lane average wait
    pub fn worst_wait(&self) -> Option<f64> {
        self.avg_wait.values().copied().reduce(f64::max)
    }
}

/// State of a single run. Built fresh from a [`Network`] for every run.
pub struct Simulator<'a> {
    network: &'a Network,
    config: &'a SimConfig,
    lanes: Vec<SimLane>,
    stats: Vec<LaneStats>,
    events: EventQueue,
    processed: u64,
}

impl<'a> Simulator<'a> {
    pub fn new(network: &'a Network, config: &'a SimConfig) -> Result<Self> {
        if network.is_empty() {
            return Err(SignalError::DegenerateNetwork);
        }
        config.validate()?;

        let lanes = network
            .lanes()
            .iter()
            .enumerate()
            .map(|(i, spec)| SimLane::from_spec(LaneId(i), spec))
            .collect();

        Ok(Self {
            network,
            config,
            lanes,
            stats: vec![LaneStats::default(); network.len()],
            events: EventQueue::new(),
            processed: 0,
        })
    }

    /// Run to the horizon and consume the simulator
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<SimulationReport> {
        self.init_sources(rng);

        while let Some(event) = self.events.pop_next() {
            if event.time > self.config.horizon {
                break;
            }
            self.processed += 1;
            if self.processed > self.config.max_events {
                return Err(SignalError::EventLimitExceeded {
                    limit: self.config.max_events,
                });
            }

            match event.kind {
                EventKind::Arrival => self.process_arrival(event.time, event.lane, rng),
                EventKind::Release => self.process_release(event.time, event.lane),
            }
        }

        Ok(self.into_report())
    }

    fn init_sources<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for lane in &self.lanes {
            if let Some(mean) = lane.mean_interarrival {
                let first = sample_interarrival(mean, rng);
                self.events.schedule(first, EventKind::Arrival, lane.id);
            }
        }
    }

    fn process_arrival<R: Rng + ?Sized>(&mut self, t: f64, lane_id: LaneId, rng: &mut R) {
        let lane = &mut self.lanes[lane_id.0];

        // Vehicles queued behind the head are released by the Release chain
        if lane.enqueue(t) == 1 {
            self.schedule_departure(t, lane_id);
        }

        if let Some(mean) = self.lanes[lane_id.0].mean_interarrival {
            let next = t + sample_interarrival(mean, rng);
            self.events.schedule(next, EventKind::Arrival, lane_id);
        }
    }

    /// Schedule the Release of a vehicle that reached the stop line of an empty lane
    fn schedule_departure(&mut self, t: f64, lane_id: LaneId) {
        let light = &self.lanes[lane_id.0].light;
        let release = t
            + light.time_to_next_green(t)
            + self.config.reaction_time
            + self.config.crossing_time;
        self.events.schedule(release, EventKind::Release, lane_id);
    }

    fn process_release(&mut self, t: f64, lane_id: LaneId) {
        let crossing = self.config.crossing_time;
        let lane = &mut self.lanes[lane_id.0];

        let Some(arrival) = lane.pop_head() else {
            return;
        };

        let wait = ((t - crossing) - arrival).max(0.0);
        let stats = &mut self.stats[lane_id.0];
        stats.waits.push(wait);
        stats.passed += 1;
        if self.config.record_departures {
            stats.departures.push(Departure {
                arrival,
                release: t,
                wait,
            });
        }

        if lane.is_empty() {
            return;
        }

        let next = if lane.light.is_green(t) {
            // Back-to-back discharge while green
            t + crossing
        } else {
            t + lane.light.time_to_next_green(t) + self.config.reaction_time + crossing
        };
        self.events.schedule(next, EventKind::Release, lane_id);
    }

    fn into_report(self) -> SimulationReport {
        let mut report = SimulationReport {
            events_processed: self.processed,
            ..SimulationReport::default()
        };

        for ((spec, lane), stats) in self
            .network
            .lanes()
            .iter()
            .zip(&self.lanes)
            .zip(self.stats)
        {
            let name = spec.name.clone();
            report.avg_wait.insert(name.clone(), stats.average_wait());
            report.passed.insert(name.clone(), stats.passed);
            report.queued.insert(name.clone(), lane.queue_len());
            if self.config.record_departures {
                report.departures.insert(name, stats.departures);
            }
        }

        debug!(
            "simulation finished: {} events, {} vehicles passed, {} still queued",
            report.events_processed,
            report.passed.values().sum::<u64>(),
            report.queued.values().sum::<usize>()
        );

        report
    }
}

/// Run one simulation of `network` using randomness from `rng`
pub fn simulate<R: Rng + ?Sized>(
    network: &Network,
    config: &SimConfig,
    rng: &mut R,
) -> Result<SimulationReport> {
    Simulator::new(network, config)?.run(rng)
}
