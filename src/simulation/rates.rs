//! Arrival rate configuration
//!
//! A run is driven either by constant per-direction rates or by a
//! time-of-day profile over base rates. Exactly one of the two is accepted.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use super::traffic_patterns::{time_of_day, TrafficPatternProfile};
use super::types::{Direction, SimTime};

/// Expected vehicles per second for each approach direction
///
/// Directions without an entry never produce arrivals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrivalRates {
    rates: BTreeMap<Direction, f64>,
}

impl ArrivalRates {
    /// Validate and collect rates; each must be finite and non-negative
    pub fn new(rates: impl IntoIterator<Item = (Direction, f64)>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (direction, rate) in rates {
            if !(rate.is_finite() && rate >= 0.0) {
                bail!("arrival rate for {direction} must be finite and >= 0, got {rate}");
            }
            if map.insert(direction, rate).is_some() {
                bail!("arrival rate for {direction} given more than once");
            }
        }
        Ok(Self { rates: map })
    }

    /// Rate for `direction`, 0.0 when not configured
    pub fn get(&self, direction: Direction) -> f64 {
        self.rates.get(&direction).copied().unwrap_or(0.0)
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.rates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        self.rates.iter().map(|(d, r)| (*d, *r))
    }

    /// Sum of all rates, the expected arrivals per second at the intersection
    pub fn total(&self) -> f64 {
        self.rates.values().sum()
    }

    pub fn scaled(&self, multiplier: f64) -> ArrivalRates {
        ArrivalRates {
            rates: self
                .rates
                .iter()
                .map(|(d, r)| (*d, r * multiplier))
                .collect(),
        }
    }
}

/// Source of arrival rates for a run
#[derive(Debug, Clone, PartialEq)]
pub enum RateInput {
    Constant(ArrivalRates),
    Dynamic(TrafficPatternProfile),
}

impl RateInput {
    /// Resolve optional inputs, failing unless exactly one is present
    pub fn from_parts(
        constant: Option<ArrivalRates>,
        dynamic: Option<TrafficPatternProfile>,
    ) -> Result<Self> {
        match (constant, dynamic) {
            (Some(rates), None) => Ok(RateInput::Constant(rates)),
            (None, Some(profile)) => Ok(RateInput::Dynamic(profile)),
            (None, None) => {
                bail!("either constant arrival rates or a traffic pattern profile must be provided")
            }
            (Some(_), Some(_)) => {
                bail!("constant arrival rates and a traffic pattern profile are mutually exclusive")
            }
        }
    }

    /// Rates the per-direction generators are created from
    pub fn base_rates(&self) -> &ArrivalRates {
        match self {
            RateInput::Constant(rates) => rates,
            RateInput::Dynamic(profile) => profile.base_rates(),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, RateInput::Dynamic(_))
    }

    /// Rate for `direction` at simulated time `now`
    pub fn rate_at(&self, direction: Direction, now: SimTime) -> f64 {
        match self {
            RateInput::Constant(rates) => rates.get(direction),
            RateInput::Dynamic(profile) => profile.rate_at(direction, time_of_day(now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> ArrivalRates {
        ArrivalRates::new([(Direction::North, 0.1), (Direction::East, 0.2)]).unwrap()
    }

    #[test]
    fn negative_and_nan_rates_are_rejected() {
        assert!(ArrivalRates::new([(Direction::North, -0.1)]).is_err());
        assert!(ArrivalRates::new([(Direction::North, f64::NAN)]).is_err());
        assert!(ArrivalRates::new([(Direction::North, f64::INFINITY)]).is_err());
        assert!(ArrivalRates::new([(Direction::North, 0.0)]).is_ok());
    }

    #[test]
    fn duplicate_direction_is_rejected() {
        assert!(ArrivalRates::new([(Direction::West, 0.1), (Direction::West, 0.2)]).is_err());
    }

    #[test]
    fn missing_direction_has_zero_rate() {
        assert_eq!(rates().get(Direction::South), 0.0);
        assert!((rates().total() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn exactly_one_rate_source_is_required() {
        let profile = TrafficPatternProfile::new(rates());
        assert!(RateInput::from_parts(None, None).is_err());
        assert!(RateInput::from_parts(Some(rates()), Some(profile.clone())).is_err());
        assert!(!RateInput::from_parts(Some(rates()), None).unwrap().is_dynamic());
        assert!(RateInput::from_parts(None, Some(profile)).unwrap().is_dynamic());
    }

    #[test]
    fn dynamic_rate_follows_time_of_day() {
        let input = RateInput::Dynamic(TrafficPatternProfile::new(rates()));
        let eight_am = 8.0 * 3600.0;
        assert!((input.rate_at(Direction::North, eight_am) - 0.2).abs() < 1e-12);
        assert!((input.rate_at(Direction::North, 12.0 * 3600.0) - 0.1).abs() < 1e-12);

        let constant = RateInput::Constant(rates());
        assert_eq!(constant.rate_at(Direction::North, eight_am), 0.1);
    }
}
