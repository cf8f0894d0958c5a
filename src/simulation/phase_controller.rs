//! Signal phase controller
//!
//! Cycles the phases round-robin forever: green for `green` seconds, yellow
//! for `yellow` seconds, then red and on to the next phase. Lights outside
//! the active phase are never touched. There is no all-red clearance
//! interval; the next phase turns green at the instant the previous one
//! turns red.

use log::debug;

use super::intersection::Phase;
use super::scheduler::{Context, Process, Step};
use super::state::IntersectionState;
use super::types::LightState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Not started yet, or the previous phase just went red
    SelectNext,
    Green,
    Yellow,
}

pub struct PhaseController {
    phases: Vec<Phase>,
    /// Index of the phase that is (or was last) active
    current: usize,
    stage: Stage,
}

impl PhaseController {
    pub fn new(phases: Vec<Phase>) -> Self {
        debug_assert!(!phases.is_empty(), "phase controller needs at least one phase");
        Self {
            current: phases.len().saturating_sub(1),
            phases,
            stage: Stage::SelectNext,
        }
    }

    fn set_phase_lights(&self, state: &mut IntersectionState, light_state: LightState, now: f64) {
        let phase = &self.phases[self.current];
        for direction in &phase.lights {
            state.set_light(*direction, light_state);
        }
        debug!(
            "t={:.1}: phase {} {:?} -> {:?}",
            now, self.current, phase.lights, light_state
        );
    }
}

impl Process<IntersectionState> for PhaseController {
    fn resume(&mut self, ctx: &mut Context<'_, IntersectionState>) -> Step {
        let now = ctx.now();
        match self.stage {
            Stage::SelectNext => {}
            Stage::Green => {
                self.set_phase_lights(ctx.state, LightState::Yellow, now);
                self.stage = Stage::Yellow;
                return Step::Timeout(self.phases[self.current].cycle_time.yellow());
            }
            Stage::Yellow => {
                self.set_phase_lights(ctx.state, LightState::Red, now);
            }
        }

        self.current = (self.current + 1) % self.phases.len();
        self.set_phase_lights(ctx.state, LightState::Green, now);
        self.stage = Stage::Green;
        Step::Timeout(self.phases[self.current].cycle_time.green())
    }
}
