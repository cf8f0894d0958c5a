//! Time-of-day traffic patterns
//!
//! The day is split into named bands, each scaling the base arrival rates by
//! a fixed multiplier. Band boundaries are inclusive and evaluated at whole
//! second resolution.

use chrono::{NaiveTime, Timelike};
use std::fmt;

use super::rates::ArrivalRates;
use super::types::{Direction, SimTime, SECONDS_PER_DAY};

const HOUR: u32 = 60 * 60;

/// Named time-of-day band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficPattern {
    /// 07:00 - 09:00
    MorningRush,
    /// 16:00 - 18:00
    EveningRush,
    /// 23:00 - 05:00
    Night,
    Normal,
}

impl TrafficPattern {
    /// Band active at `time`
    pub fn at(time: NaiveTime) -> TrafficPattern {
        let seconds = time.num_seconds_from_midnight();
        if (7 * HOUR..=9 * HOUR).contains(&seconds) {
            TrafficPattern::MorningRush
        } else if (16 * HOUR..=18 * HOUR).contains(&seconds) {
            TrafficPattern::EveningRush
        } else if seconds >= 23 * HOUR || seconds <= 5 * HOUR {
            TrafficPattern::Night
        } else {
            TrafficPattern::Normal
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            TrafficPattern::MorningRush => 2.0,
            TrafficPattern::EveningRush => 1.8,
            TrafficPattern::Night => 0.3,
            TrafficPattern::Normal => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrafficPattern::MorningRush => "morning_rush",
            TrafficPattern::EveningRush => "evening_rush",
            TrafficPattern::Night => "night",
            TrafficPattern::Normal => "normal",
        }
    }
}

impl fmt::Display for TrafficPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Project simulated seconds onto a 24-hour clock face
pub fn time_of_day(now: SimTime) -> NaiveTime {
    let seconds = (now.max(0.0).floor() as u64) % SECONDS_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).unwrap_or_default()
}

/// Arrival rates that follow the time-of-day bands
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficPatternProfile {
    base_rates: ArrivalRates,
}

impl TrafficPatternProfile {
    pub fn new(base_rates: ArrivalRates) -> Self {
        Self { base_rates }
    }

    pub fn base_rates(&self) -> &ArrivalRates {
        &self.base_rates
    }

    pub fn pattern_at(&self, time: NaiveTime) -> TrafficPattern {
        TrafficPattern::at(time)
    }

    /// Base rates scaled by the band active at `time`
    pub fn rates_at(&self, time: NaiveTime) -> ArrivalRates {
        self.base_rates.scaled(TrafficPattern::at(time).multiplier())
    }

    pub fn rate_at(&self, direction: Direction, time: NaiveTime) -> f64 {
        self.base_rates.get(direction) * TrafficPattern::at(time).multiplier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(TrafficPattern::at(at(7, 0, 0)), TrafficPattern::MorningRush);
        assert_eq!(TrafficPattern::at(at(9, 0, 0)), TrafficPattern::MorningRush);
        assert_eq!(TrafficPattern::at(at(9, 0, 1)), TrafficPattern::Normal);
        assert_eq!(TrafficPattern::at(at(16, 0, 0)), TrafficPattern::EveningRush);
        assert_eq!(TrafficPattern::at(at(18, 0, 0)), TrafficPattern::EveningRush);
        assert_eq!(TrafficPattern::at(at(23, 0, 0)), TrafficPattern::Night);
        assert_eq!(TrafficPattern::at(at(5, 0, 0)), TrafficPattern::Night);
        assert_eq!(TrafficPattern::at(at(5, 0, 1)), TrafficPattern::Normal);
    }

    #[test]
    fn time_of_day_wraps_every_24_hours() {
        assert_eq!(time_of_day(0.0), at(0, 0, 0));
        assert_eq!(time_of_day(8.0 * 3600.0 + 0.75), at(8, 0, 0));
        assert_eq!(time_of_day(86_400.0 + 61.0), at(0, 1, 1));
    }
}
