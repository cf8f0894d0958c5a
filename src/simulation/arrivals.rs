//! Per-direction arrival generator
//!
//! Inter-arrival delays are exponential with mean `1 / rate`, where the rate
//! is either constant or taken from the time-of-day profile at the current
//! simulated time. After each delay one vehicle is spawned on a lane of the
//! generator's direction.

use log::{debug, warn};
use rand::Rng;
use rand_distr::{Distribution, Exp};

use super::rates::RateInput;
use super::scheduler::{Context, Process, Step};
use super::state::IntersectionState;
use super::types::{Direction, SimTime, VehicleId};
use super::vehicle::VehicleWaiter;

pub struct ArrivalGenerator {
    direction: Direction,
    rates: RateInput,
    vehicles_spawned: u64,
    /// True while a sampled inter-arrival delay is running
    awaiting_arrival: bool,
}

impl ArrivalGenerator {
    pub fn new(direction: Direction, rates: RateInput) -> Self {
        Self {
            direction,
            rates,
            vehicles_spawned: 0,
            awaiting_arrival: false,
        }
    }

    /// Rate for this direction at `now`, in vehicles per second
    pub fn current_rate(&self, now: SimTime) -> f64 {
        self.rates.rate_at(self.direction, now)
    }

    /// Mean of the delay sampled at `now`, or `None` when no vehicle will come
    pub fn mean_interarrival(&self, now: SimTime) -> Option<SimTime> {
        let rate = self.current_rate(now);
        Some(1.0 / rate).filter(|mean| rate > 0.0 && mean.is_finite())
    }

    /// Draw the delay until the next arrival at `now`. `None` means this
    /// direction sees no further traffic: the rate is zero, or so small that
    /// the delay is not representable.
    fn next_delay<R: Rng + ?Sized>(&self, now: SimTime, rng: &mut R) -> Option<SimTime> {
        let rate = self.current_rate(now);
        if rate <= 0.0 {
            return None;
        }
        let distribution = match Exp::new(rate) {
            Ok(distribution) => distribution,
            Err(e) => {
                warn!("invalid arrival rate {rate} for {}: {e}", self.direction);
                return None;
            }
        };
        let delay = distribution.sample(rng);
        delay.is_finite().then_some(delay)
    }

    fn spawn_vehicle(&mut self, ctx: &mut Context<'_, IntersectionState>) {
        self.vehicles_spawned += 1;
        let state = &mut *ctx.state;
        let lane = state.lanes.choose_lane(self.direction, &mut state.rng);
        ctx.spawn(VehicleWaiter::new(VehicleId(self.vehicles_spawned), lane));
    }
}

impl Process<IntersectionState> for ArrivalGenerator {
    fn resume(&mut self, ctx: &mut Context<'_, IntersectionState>) -> Step {
        if self.awaiting_arrival {
            self.spawn_vehicle(ctx);
        }

        let now = ctx.now();
        match self.next_delay(now, &mut ctx.state.rng) {
            Some(delay) => {
                self.awaiting_arrival = true;
                Step::Timeout(delay)
            }
            None => {
                debug!(
                    "t={:.1}: no further arrivals from {} (rate {}), generator retired after {} vehicles",
                    now,
                    self.direction,
                    self.current_rate(now),
                    self.vehicles_spawned
                );
                Step::Done
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::intersection::Intersection;
    use crate::simulation::rates::ArrivalRates;
    use crate::simulation::scheduler::Scheduler;
    use crate::simulation::traffic_patterns::TrafficPatternProfile;
    use crate::simulation::types::CycleTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HOUR: SimTime = 3600.0;

    fn north(rate: f64) -> ArrivalRates {
        ArrivalRates::new([(Direction::North, rate)]).unwrap()
    }

    fn dynamic(rate: f64) -> ArrivalGenerator {
        ArrivalGenerator::new(
            Direction::North,
            RateInput::Dynamic(TrafficPatternProfile::new(north(rate))),
        )
    }

    #[test]
    fn morning_rush_doubles_the_rate() {
        let generator = dynamic(0.2);
        let mean = generator.mean_interarrival(8.0 * HOUR).unwrap();
        assert!((mean - 2.5).abs() < 1e-12);
    }

    #[test]
    fn mean_follows_each_band() {
        let generator = dynamic(0.2);
        for (hour, multiplier) in [(17.0, 1.8), (12.0, 1.0), (1.0, 0.3)] {
            let mean = generator.mean_interarrival(hour * HOUR).unwrap();
            assert!((mean - 1.0 / (0.2 * multiplier)).abs() < 1e-9, "hour {hour}");
        }
    }

    #[test]
    fn rate_changes_when_crossing_a_band_boundary() {
        let generator = dynamic(0.1);
        let before = 8.0 * HOUR + 59.0 * 60.0 + 59.0;
        assert!((generator.current_rate(before) - 0.2).abs() < 1e-12);
        assert!((generator.current_rate(before + 1.0) - 0.2).abs() < 1e-12);
        assert!((generator.current_rate(before + 2.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_rate_never_spawns() {
        let intersection = Intersection::basic_four_way(CycleTime::new(30.0, 3.0).unwrap());
        let mut state = IntersectionState::new(&intersection, StdRng::seed_from_u64(9));
        let mut scheduler = Scheduler::new(0.0);
        let generator = ArrivalGenerator::new(Direction::North, RateInput::Constant(north(0.0)));
        assert_eq!(generator.mean_interarrival(0.0), None);

        scheduler.spawn(&mut state, generator);
        scheduler.run(&mut state, 100_000.0);
        assert_eq!(state.stats.total_vehicles(), 0);
        assert_eq!(scheduler.live_processes(), 0);
    }

    #[test]
    fn vanishing_rate_retires_instead_of_scheduling_infinity() {
        let intersection = Intersection::basic_four_way(CycleTime::new(30.0, 3.0).unwrap());
        let mut state = IntersectionState::new(&intersection, StdRng::seed_from_u64(1));
        let mut scheduler = Scheduler::new(0.0);
        let generator = ArrivalGenerator::new(Direction::North, RateInput::Constant(north(1e-310)));
        assert_eq!(generator.next_delay(0.0, &mut state.rng), None);
        assert_eq!(generator.mean_interarrival(0.0), None);

        scheduler.spawn(&mut state, generator);
        assert_eq!(scheduler.live_processes(), 0);
        assert_eq!(scheduler.pending(), 0);
        scheduler.run(&mut state, 100.0);
        assert_eq!(state.stats.total_vehicles(), 0);
    }

    #[test]
    fn sampled_delays_follow_the_band_rate() {
        let generator = dynamic(0.2);
        let mut rng = StdRng::seed_from_u64(3);
        let samples = 20_000;

        // 08:00 rush at 0.4 veh/s
        let rush: f64 = (0..samples)
            .map(|_| generator.next_delay(8.0 * HOUR, &mut rng).unwrap())
            .sum::<f64>()
            / samples as f64;
        assert!((rush - 2.5).abs() < 0.1, "rush mean delay {rush}");

        // 12:00 at the base 0.2 veh/s
        let midday: f64 = (0..samples)
            .map(|_| generator.next_delay(12.0 * HOUR, &mut rng).unwrap())
            .sum::<f64>()
            / samples as f64;
        assert!((midday - 5.0).abs() < 0.2, "midday mean delay {midday}");
    }

    #[test]
    fn rush_hour_run_produces_double_the_arrivals() {
        let intersection = Intersection::basic_four_way(CycleTime::new(30.0, 3.0).unwrap());
        let count = |start: SimTime| {
            let mut state = IntersectionState::new(&intersection, StdRng::seed_from_u64(17));
            let mut scheduler = Scheduler::new(start);
            scheduler.spawn(&mut state, dynamic(0.2));
            scheduler.run(&mut state, start + 1800.0);
            state.stats.total_vehicles() as f64
        };

        // 1800s at 0.4 veh/s = 720 (sd ~27), at 0.2 veh/s = 360 (sd ~19)
        let rush = count(7.0 * HOUR);
        let midday = count(12.0 * HOUR);
        assert!((600.0..=840.0).contains(&rush), "rush produced {rush}");
        assert!((280.0..=440.0).contains(&midday), "midday produced {midday}");
    }

    #[test]
    fn arrivals_are_counted_with_increasing_ids() {
        let intersection = Intersection::basic_four_way(CycleTime::new(30.0, 3.0).unwrap());
        let mut state = IntersectionState::new(&intersection, StdRng::seed_from_u64(11));
        let mut scheduler = Scheduler::new(0.0);
        scheduler.spawn(
            &mut state,
            ArrivalGenerator::new(Direction::North, RateInput::Constant(north(0.5))),
        );
        scheduler.run(&mut state, 600.0);

        assert!(state.stats.total_vehicles() > 0);
        // The North light never turns green without a phase controller
        let lane = &state.lanes.lanes_for(Direction::North)[0];
        let ids: Vec<u64> = lane.iter().map(|v| v.vehicle_id.0).collect();
        let expected: Vec<u64> = (1..=state.stats.total_vehicles()).collect();
        assert_eq!(ids, expected);
    }
}
