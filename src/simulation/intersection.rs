//! Intersection configuration
//!
//! Lights, phases and lanes are plain configuration data. They are validated
//! once in [`Intersection::new`] and are read-only afterwards; the engine
//! copies the initial light states into its own runtime state.

use anyhow::{bail, Result};
use std::collections::{BTreeMap, BTreeSet};

use super::types::{CycleTime, Direction, LightState, TrafficLight};

/// A set of lights that change state together, with one green/yellow timing
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// Lights of this phase, referenced by their source direction
    pub lights: Vec<Direction>,
    pub cycle_time: CycleTime,
}

impl Phase {
    pub fn new(lights: Vec<Direction>, cycle_time: CycleTime) -> Self {
        Self { lights, cycle_time }
    }
}

/// A queueing channel for one approach, bound to one traffic light
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    /// The controlling light, referenced by its source direction
    pub light: Direction,
    pub name: Option<String>,
}

impl Lane {
    pub fn new(light: Direction) -> Self {
        Self { light, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A signalized intersection: one light per approach, an ordered phase
/// cycle and optional per-direction lanes
#[derive(Debug, Clone)]
pub struct Intersection {
    lights: BTreeMap<Direction, TrafficLight>,
    phases: Vec<Phase>,
    lanes: Option<BTreeMap<Direction, Vec<Lane>>>,
}

impl Intersection {
    /// Build an intersection, checking that every light belongs to exactly
    /// one phase and that every lane points at a configured light.
    pub fn new(
        lights: impl IntoIterator<Item = TrafficLight>,
        phases: Vec<Phase>,
        lanes: Option<BTreeMap<Direction, Vec<Lane>>>,
    ) -> Result<Self> {
        let mut light_map = BTreeMap::new();
        for light in lights {
            let source = light.source;
            if light_map.insert(source, light).is_some() {
                bail!("more than one traffic light configured for {source}");
            }
        }

        if phases.is_empty() {
            bail!("an intersection needs at least one phase");
        }

        let mut assigned = BTreeSet::new();
        for (index, phase) in phases.iter().enumerate() {
            if phase.lights.is_empty() {
                bail!("phase {index} has no lights");
            }
            for direction in &phase.lights {
                if !light_map.contains_key(direction) {
                    bail!("phase {index} references unknown light {direction}");
                }
                if !assigned.insert(*direction) {
                    bail!("light {direction} belongs to more than one phase");
                }
            }
        }
        if let Some(orphan) = light_map.keys().find(|d| !assigned.contains(*d)) {
            bail!("light {orphan} does not belong to any phase");
        }

        if let Some(lanes) = &lanes {
            for (direction, direction_lanes) in lanes {
                if direction_lanes.is_empty() {
                    bail!("lane list for {direction} is empty");
                }
                for lane in direction_lanes {
                    if !light_map.contains_key(&lane.light) {
                        bail!("lane on {direction} is bound to unknown light {}", lane.light);
                    }
                }
            }
        }

        Ok(Self {
            lights: light_map,
            phases,
            lanes,
        })
    }

    /// Standard four-way intersection: each approach gets a light toward the
    /// opposite side, North/South and East/West share a phase, and every
    /// approach has a single lane.
    pub fn basic_four_way(cycle_time: CycleTime) -> Self {
        Self::basic_four_way_with_state(cycle_time, LightState::Red)
    }

    pub fn basic_four_way_with_state(cycle_time: CycleTime, light_state: LightState) -> Self {
        let lights: BTreeMap<Direction, TrafficLight> = Direction::ALL
            .iter()
            .map(|&d| {
                let mut light =
                    TrafficLight::new(d, d.opposite()).with_name(format!("{}_Bound", d.name()));
                light.state = light_state;
                (d, light)
            })
            .collect();

        let phases = vec![
            Phase::new(vec![Direction::North, Direction::South], cycle_time),
            Phase::new(vec![Direction::East, Direction::West], cycle_time),
        ];

        let lanes = Direction::ALL
            .iter()
            .map(|&d| (d, vec![Lane::new(d)]))
            .collect();

        Self {
            lights,
            phases,
            lanes: Some(lanes),
        }
    }

    pub fn lights(&self) -> &BTreeMap<Direction, TrafficLight> {
        &self.lights
    }

    pub fn light(&self, direction: Direction) -> Option<&TrafficLight> {
        self.lights.get(&direction)
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Configured lanes for `direction`, if the intersection has a lane layout for it
    pub fn lanes_for(&self, direction: Direction) -> Option<&[Lane]> {
        self.lanes
            .as_ref()
            .and_then(|lanes| lanes.get(&direction))
            .map(Vec::as_slice)
    }

    /// Index of the phase that owns the light for `direction`
    pub fn phase_of(&self, direction: Direction) -> Option<usize> {
        self.phases
            .iter()
            .position(|phase| phase.lights.contains(&direction))
    }
}
