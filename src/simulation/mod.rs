//! Intersection simulation engine
//!
//! A discrete-event scheduler drives three kinds of cooperating processes:
//! the phase controller cycling the lights, one arrival generator per
//! approach, and one waiting process per vehicle. All of them share the
//! light states, lane queues and statistics held in [`IntersectionState`].

mod arrivals;
mod intersection;
mod lanes;
mod phase_controller;
mod rates;
mod scheduler;
mod state;
mod stats;
mod traffic_patterns;
mod types;
mod vehicle;
mod world;

pub use arrivals::ArrivalGenerator;
pub use intersection::{Intersection, Lane, Phase};
pub use lanes::{LaneQueue, LaneStore, QueuedVehicle};
pub use phase_controller::PhaseController;
pub use rates::{ArrivalRates, RateInput};
pub use scheduler::{Context, Process, Scheduler, Step};
pub use state::{DepartureRecord, IntersectionState};
pub use stats::{HistogramBin, StatisticsSnapshot, SummaryStatistics};
pub use traffic_patterns::{time_of_day, TrafficPattern, TrafficPatternProfile};
pub use types::{
    CycleTime, Direction, LaneId, LightState, SimTime, TrafficLight, VehicleId, SECONDS_PER_DAY,
    VEHICLE_POLL_INTERVAL,
};
pub use vehicle::VehicleWaiter;
pub use world::{run_simulation, simulate, IntersectionSimulation};
