//! Per-lane FIFO queues
//!
//! Vehicles join the tail of their lane on arrival and leave from the head on
//! departure; nothing is ever reordered.

use rand::Rng;
use std::collections::{BTreeMap, VecDeque};

use super::intersection::Intersection;
use super::types::{Direction, LaneId, SimTime, VehicleId};

/// A vehicle waiting in a lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedVehicle {
    pub vehicle_id: VehicleId,
    pub arrival_time: SimTime,
}

/// Runtime queue of one lane
#[derive(Debug, Clone)]
pub struct LaneQueue {
    pub id: LaneId,
    /// Controlling light, referenced by its source direction
    pub light: Direction,
    pub name: Option<String>,
    queue: VecDeque<QueuedVehicle>,
}

impl LaneQueue {
    fn new(id: LaneId, light: Direction, name: Option<String>) -> Self {
        Self {
            id,
            light,
            name,
            queue: VecDeque::new(),
        }
    }

    pub fn push_back(&mut self, vehicle: QueuedVehicle) {
        self.queue.push_back(vehicle);
    }

    pub fn front(&self) -> Option<&QueuedVehicle> {
        self.queue.front()
    }

    pub fn pop_front(&mut self) -> Option<QueuedVehicle> {
        self.queue.pop_front()
    }

    /// Whether `vehicle_id` is at the head of the queue
    pub fn is_head(&self, vehicle_id: VehicleId) -> bool {
        self.queue
            .front()
            .is_some_and(|head| head.vehicle_id == vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedVehicle> {
        self.queue.iter()
    }
}

/// All lane queues of the intersection, grouped by approach direction
#[derive(Debug, Clone, Default)]
pub struct LaneStore {
    lanes: BTreeMap<Direction, Vec<LaneQueue>>,
}

impl LaneStore {
    /// Create empty queues for every lane the intersection configures.
    /// Directions without a lane layout get a synthetic lane on first use.
    pub fn from_intersection(intersection: &Intersection) -> Self {
        let lanes = Direction::ALL
            .iter()
            .filter_map(|&direction| {
                let configured = intersection.lanes_for(direction)?;
                let queues = configured
                    .iter()
                    .enumerate()
                    .map(|(index, lane)| {
                        LaneQueue::new(LaneId { direction, index }, lane.light, lane.name.clone())
                    })
                    .collect();
                Some((direction, queues))
            })
            .collect();
        Self { lanes }
    }

    pub fn lanes_for(&self, direction: Direction) -> &[LaneQueue] {
        self.lanes
            .get(&direction)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn lane(&self, id: LaneId) -> Option<&LaneQueue> {
        self.lanes.get(&id.direction)?.get(id.index)
    }

    pub fn lane_mut(&mut self, id: LaneId) -> Option<&mut LaneQueue> {
        self.lanes.get_mut(&id.direction)?.get_mut(id.index)
    }

    /// Pick the lane a new arrival from `direction` joins: uniformly at random
    /// among several lanes, the only lane otherwise. A direction without lanes
    /// gets a single lane bound to its own light, created here and reused.
    pub fn choose_lane<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> LaneId {
        let lanes = self.lanes.entry(direction).or_insert_with(|| {
            vec![LaneQueue::new(
                LaneId {
                    direction,
                    index: 0,
                },
                direction,
                None,
            )]
        });

        let index = match lanes.len() {
            0 | 1 => 0,
            n => rng.random_range(0..n),
        };
        LaneId { direction, index }
    }

    /// Vehicles currently queued across all lanes
    pub fn queued_vehicles(&self) -> usize {
        self.iter().map(LaneQueue::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LaneQueue> {
        self.lanes.values().flatten()
    }
}
