//! Time-of-day traffic pattern validation test

use chrono::NaiveTime;

use intersection_sim::simulation::{
    time_of_day, ArrivalRates, Direction, RateInput, TrafficPattern, TrafficPatternProfile,
};

fn clock(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

fn profile() -> TrafficPatternProfile {
    TrafficPatternProfile::new(
        ArrivalRates::new([(Direction::North, 0.1), (Direction::East, 0.2)]).unwrap(),
    )
}

#[test]
fn test_bands_cover_the_day() {
    let profile = profile();
    let cases = [
        (clock(0, 0, 0), TrafficPattern::Night),
        (clock(4, 59, 59), TrafficPattern::Night),
        (clock(6, 30, 0), TrafficPattern::Normal),
        (clock(8, 15, 0), TrafficPattern::MorningRush),
        (clock(13, 0, 0), TrafficPattern::Normal),
        (clock(17, 45, 0), TrafficPattern::EveningRush),
        (clock(20, 0, 0), TrafficPattern::Normal),
        (clock(23, 30, 0), TrafficPattern::Night),
    ];
    for (time, expected) in cases {
        assert_eq!(profile.pattern_at(time), expected, "at {time}");
    }
}

#[test]
fn test_rates_scale_with_the_band() {
    let profile = profile();

    let rush = profile.rates_at(clock(8, 0, 0));
    assert!((rush.get(Direction::North) - 0.2).abs() < 1e-12);
    assert!((rush.get(Direction::East) - 0.4).abs() < 1e-12);

    let evening = profile.rates_at(clock(17, 0, 0));
    assert!((evening.get(Direction::East) - 0.36).abs() < 1e-12);

    let night = profile.rates_at(clock(2, 0, 0));
    assert!((night.get(Direction::North) - 0.03).abs() < 1e-12);

    // Directions without a base rate stay at zero in every band
    assert_eq!(rush.get(Direction::West), 0.0);
}

#[test]
fn test_simulated_time_maps_onto_the_clock() {
    let input = RateInput::Dynamic(profile());
    let morning = 7.0 * 3600.0;

    assert_eq!(time_of_day(morning), clock(7, 0, 0));
    assert!((input.rate_at(Direction::North, morning) - 0.2).abs() < 1e-12);

    // The next day repeats the same bands
    let next_morning = morning + 86_400.0;
    assert_eq!(time_of_day(next_morning), clock(7, 0, 0));
    assert!((input.rate_at(Direction::North, next_morning) - 0.2).abs() < 1e-12);
}

#[test]
fn test_pattern_names() {
    assert_eq!(TrafficPattern::MorningRush.to_string(), "morning_rush");
    assert_eq!(TrafficPattern::Night.to_string(), "night");
    assert_eq!(TrafficPattern::Normal.multiplier(), 1.0);
}
