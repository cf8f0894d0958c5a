//! Shared runtime state touched by the simulation processes
//!
//! Light states, lane queues, statistics and the random source live here.
//! Processes only ever see this state through the scheduler, one at a time.

use rand::rngs::StdRng;
use std::collections::BTreeMap;

use super::intersection::Intersection;
use super::lanes::LaneStore;
use super::stats::SummaryStatistics;
use super::types::{Direction, LaneId, LightState, SimTime, VehicleId};

/// One vehicle leaving the intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepartureRecord {
    pub lane: LaneId,
    pub vehicle_id: VehicleId,
    pub arrival_time: SimTime,
    pub departure_time: SimTime,
}

impl DepartureRecord {
    pub fn wait(&self) -> SimTime {
        self.departure_time - self.arrival_time
    }
}

pub struct IntersectionState {
    pub lights: BTreeMap<Direction, LightState>,
    pub lanes: LaneStore,
    pub stats: SummaryStatistics,
    pub departures: Vec<DepartureRecord>,
    pub rng: StdRng,
}

impl IntersectionState {
    pub fn new(intersection: &Intersection, rng: StdRng) -> Self {
        Self {
            lights: intersection
                .lights()
                .iter()
                .map(|(direction, light)| (*direction, light.state))
                .collect(),
            lanes: LaneStore::from_intersection(intersection),
            stats: SummaryStatistics::new(),
            departures: Vec::new(),
            rng,
        }
    }

    pub fn light_state(&self, direction: Direction) -> LightState {
        self.lights.get(&direction).copied().unwrap_or_default()
    }

    pub fn set_light(&mut self, direction: Direction, state: LightState) {
        if let Some(light) = self.lights.get_mut(&direction) {
            *light = state;
        }
    }
}
