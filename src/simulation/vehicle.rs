//! Per-vehicle waiting process
//!
//! A vehicle joins the tail of its lane, then checks once per second whether
//! its light is green and it is at the head of the queue. When both hold it
//! records its wait, leaves the queue and finishes.

use log::trace;

use super::lanes::QueuedVehicle;
use super::scheduler::{Context, Process, Step};
use super::state::{DepartureRecord, IntersectionState};
use super::types::{LaneId, LightState, SimTime, VehicleId, VEHICLE_POLL_INTERVAL};

pub struct VehicleWaiter {
    vehicle_id: VehicleId,
    lane: LaneId,
    /// Set when the vehicle joins its lane on the first resume
    arrival_time: Option<SimTime>,
}

impl VehicleWaiter {
    pub fn new(vehicle_id: VehicleId, lane: LaneId) -> Self {
        Self {
            vehicle_id,
            lane,
            arrival_time: None,
        }
    }

    fn arrive(&mut self, state: &mut IntersectionState, now: SimTime) -> bool {
        let Some(lane) = state.lanes.lane_mut(self.lane) else {
            debug_assert!(false, "vehicle assigned to unknown lane {:?}", self.lane);
            return false;
        };
        lane.push_back(QueuedVehicle {
            vehicle_id: self.vehicle_id,
            arrival_time: now,
        });
        state.stats.record_arrival();
        self.arrival_time = Some(now);
        trace!(
            "t={:.1}: vehicle {} arrived on {:?}",
            now,
            self.vehicle_id.0,
            self.lane
        );
        true
    }

    /// Leave the lane if the light is green and this vehicle is at the head
    fn try_depart(&self, state: &mut IntersectionState, now: SimTime, arrival_time: SimTime) -> bool {
        let Some(lane) = state.lanes.lane(self.lane) else {
            return false;
        };
        if state.light_state(lane.light) != LightState::Green || !lane.is_head(self.vehicle_id) {
            return false;
        }

        if let Some(lane) = state.lanes.lane_mut(self.lane) {
            let head = lane.pop_front();
            debug_assert_eq!(
                head.map(|v| v.vehicle_id),
                Some(self.vehicle_id),
                "queue head changed between check and departure"
            );
        }

        let wait = now - arrival_time;
        state.stats.record_departure(wait);
        state.departures.push(DepartureRecord {
            lane: self.lane,
            vehicle_id: self.vehicle_id,
            arrival_time,
            departure_time: now,
        });
        trace!(
            "t={:.1}: vehicle {} departed {:?} after {:.1}s",
            now,
            self.vehicle_id.0,
            self.lane,
            wait
        );
        true
    }
}

impl Process<IntersectionState> for VehicleWaiter {
    fn resume(&mut self, ctx: &mut Context<'_, IntersectionState>) -> Step {
        let now = ctx.now();
        let arrival_time = match self.arrival_time {
            Some(arrival_time) => arrival_time,
            None => {
                if !self.arrive(ctx.state, now) {
                    return Step::Done;
                }
                now
            }
        };

        if self.try_depart(ctx.state, now, arrival_time) {
            Step::Done
        } else {
            Step::Timeout(VEHICLE_POLL_INTERVAL)
        }
    }
}
