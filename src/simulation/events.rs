//! Time-ordered event queue for the discrete-event simulator

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::types::{EventKind, LaneId};

/// An event waiting in the queue
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub time: f64,
    /// Insertion order, only used to break exact time ties
    pub seq: u64,
    pub kind: EventKind,
    pub lane: LaneId,
}

impl Event {
    fn key(&self) -> (OrderedFloat<f64>, u64) {
        (OrderedFloat(self.time), self.seq)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    // BinaryHeap is a max-heap; reverse so the earliest (time, seq) pops first
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Priority queue of events ordered by `(time, seq)`
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event; events sharing a timestamp pop in insertion order
    pub fn schedule(&mut self, time: f64, kind: EventKind, lane: LaneId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Event {
            time,
            seq,
            kind,
            lane,
        });
    }

    /// Remove and return the earliest event
    pub fn pop_next(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|event| event.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
