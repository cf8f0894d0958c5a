//! Simulation entry point
//!
//! [`IntersectionSimulation`] wires the phase controller and one arrival
//! generator per configured direction into a scheduler and drives it.
//! [`simulate`] is the one-call form used by the binary.

use anyhow::{bail, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use super::arrivals::ArrivalGenerator;
use super::intersection::Intersection;
use super::lanes::LaneQueue;
use super::phase_controller::PhaseController;
use super::rates::RateInput;
use super::scheduler::Scheduler;
use super::state::{DepartureRecord, IntersectionState};
use super::stats::SummaryStatistics;
use super::types::{Direction, LightState, SimTime};

/// A running intersection simulation
pub struct IntersectionSimulation {
    scheduler: Scheduler<IntersectionState>,
    state: IntersectionState,
    start_time: SimTime,
}

impl IntersectionSimulation {
    /// Create a simulation whose random source is seeded from `seed`
    pub fn new_with_seed(
        intersection: &Intersection,
        rates: RateInput,
        start_time: SimTime,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(intersection, rates, start_time, StdRng::seed_from_u64(seed))
    }

    /// Create a simulation drawing all randomness from `rng`.
    ///
    /// The phase controller and the arrival generators start immediately, in
    /// that order, with generators in direction order.
    pub fn with_rng(
        intersection: &Intersection,
        rates: RateInput,
        start_time: SimTime,
        rng: StdRng,
    ) -> Result<Self> {
        if !start_time.is_finite() || start_time < 0.0 {
            bail!("start time must be a non-negative number of seconds, got {start_time}");
        }
        for direction in rates.base_rates().directions() {
            if intersection.lanes_for(direction).is_none() && intersection.light(direction).is_none() {
                bail!("arrival rate given for {direction}, but the intersection has no light or lane there");
            }
        }

        let mut state = IntersectionState::new(intersection, rng);
        let mut scheduler = Scheduler::new(start_time);

        scheduler.spawn(&mut state, PhaseController::new(intersection.phases().to_vec()));
        let directions: Vec<Direction> = rates.base_rates().directions().collect();
        for direction in directions {
            scheduler.spawn(&mut state, ArrivalGenerator::new(direction, rates.clone()));
        }

        Ok(Self {
            scheduler,
            state,
            start_time,
        })
    }

    /// Advance the clock to the absolute time `until`
    pub fn run_until(&mut self, until: SimTime) {
        self.scheduler.run(&mut self.state, until);
    }

    /// Advance the clock by `duration` seconds
    pub fn run_for(&mut self, duration: SimTime) {
        let until = self.scheduler.now() + duration;
        self.run_until(until);
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn start_time(&self) -> SimTime {
        self.start_time
    }

    pub fn statistics(&self) -> &SummaryStatistics {
        &self.state.stats
    }

    pub fn into_statistics(self) -> SummaryStatistics {
        self.state.stats
    }

    pub fn light_states(&self) -> &BTreeMap<Direction, LightState> {
        &self.state.lights
    }

    pub fn light_state(&self, direction: Direction) -> LightState {
        self.state.light_state(direction)
    }

    pub fn lanes(&self) -> impl Iterator<Item = &LaneQueue> {
        self.state.lanes.iter()
    }

    /// Vehicles that have arrived but not yet departed
    pub fn queued_vehicles(&self) -> usize {
        self.state.lanes.queued_vehicles()
    }

    /// Every departure so far, in departure order
    pub fn departures(&self) -> &[DepartureRecord] {
        &self.state.departures
    }

    /// Print a summary of the current state
    pub fn print_summary(&self) {
        println!("=== Intersection Simulation Summary ===");
        println!("Time: {:.2}s", self.now());
        for (direction, light) in self.light_states() {
            println!("  {direction:<5} light: {light:?}");
        }
        for lane in self.lanes() {
            println!(
                "  Lane {} #{}{}: queued={}",
                lane.id.direction,
                lane.id.index,
                lane.name
                    .as_deref()
                    .map(|n| format!(" ({n})"))
                    .unwrap_or_default(),
                lane.len()
            );
        }
        println!("{}", self.statistics());
    }
}

/// Run a complete simulation from `start_time` for `duration` seconds and
/// return it for inspection.
pub fn run_simulation(
    duration: SimTime,
    intersection: &Intersection,
    rates: RateInput,
    start_time: SimTime,
    rng: StdRng,
) -> Result<IntersectionSimulation> {
    if !duration.is_finite() || duration < 0.0 {
        bail!("duration must be a non-negative number of seconds, got {duration}");
    }

    info!(
        "Starting simulation: duration={}s start={}s rates={}",
        duration,
        start_time,
        if rates.is_dynamic() {
            "time-of-day profile"
        } else {
            "constant"
        }
    );

    let mut simulation = IntersectionSimulation::with_rng(intersection, rates, start_time, rng)?;
    simulation.run_until(start_time + duration);

    let stats = simulation.statistics();
    info!("=== SIMULATION COMPLETE ===");
    info!("Total vehicles: {}", stats.total_vehicles());
    info!("Departed vehicles: {}", stats.count());
    info!("Average waiting time: {:.2}s", stats.average_waiting_time());
    Ok(simulation)
}

/// Like [`run_simulation`], keeping only the collected statistics
pub fn simulate(
    duration: SimTime,
    intersection: &Intersection,
    rates: RateInput,
    start_time: SimTime,
    rng: StdRng,
) -> Result<SummaryStatistics> {
    run_simulation(duration, intersection, rates, start_time, rng)
        .map(IntersectionSimulation::into_statistics)
}
