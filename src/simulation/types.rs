//! Core types for the intersection simulation
//!
//! Directions, light states and the small value types shared by the
//! configuration and the engine.

use anyhow::{bail, Result};
use std::fmt;

/// Simulated time in seconds
pub type SimTime = f64;

/// Seconds in one day, used to project simulated time onto a clock face
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// How often a waiting vehicle re-checks its light and queue position
pub const VEHICLE_POLL_INTERVAL: SimTime = 1.0;

/// Cardinal approach direction of the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in their canonical order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The direction straight across the intersection
    pub fn opposite(self) -> Direction {
        const OPPOSITES: [Direction; 4] = [
            Direction::South,
            Direction::North,
            Direction::West,
            Direction::East,
        ];
        OPPOSITES[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Possible states of a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightState {
    Green,
    Yellow,
    #[default]
    Red,
}

impl LightState {
    /// Green or yellow, i.e. the light belongs to the active phase
    pub fn is_active(self) -> bool {
        !matches!(self, LightState::Red)
    }
}

/// A traffic light controlling movement from `source` toward `destination`
///
/// Lights are keyed by their source direction, so an intersection carries
/// at most one light per approach.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLight {
    pub source: Direction,
    pub destination: Direction,
    /// State the light starts the run in
    pub state: LightState,
    pub name: Option<String>,
}

impl TrafficLight {
    pub fn new(source: Direction, destination: Direction) -> Self {
        Self {
            source,
            destination,
            state: LightState::Red,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Green and yellow durations of a phase in seconds
///
/// Red is implicit: a phase stays red until it becomes active again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleTime {
    green: SimTime,
    yellow: SimTime,
}

impl CycleTime {
    pub fn new(green: SimTime, yellow: SimTime) -> Result<Self> {
        if !(green.is_finite() && green > 0.0) {
            bail!("green duration must be a positive number of seconds, got {green}");
        }
        if !(yellow.is_finite() && yellow > 0.0) {
            bail!("yellow duration must be a positive number of seconds, got {yellow}");
        }
        Ok(Self { green, yellow })
    }

    pub fn green(&self) -> SimTime {
        self.green
    }

    pub fn yellow(&self) -> SimTime {
        self.yellow
    }
}

/// Identifies one lane: its approach direction and its index on that approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LaneId {
    pub direction: Direction,
    pub index: usize,
}

/// Vehicle identifier, unique within its approach direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(pub u64);
