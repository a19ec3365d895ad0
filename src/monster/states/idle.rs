use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::machine::{State, StateKind};

/// Rest state: waits for a target, wanders or eventually dives.
#[derive(Debug, Default)]
pub struct Idle {
    elapsed: f32,
}

impl State for Idle {
    fn kind(&self) -> StateKind {
        StateKind::Idle
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.stop_agent();
        ctx.body.reset_triggers();
        ctx.body.set_bool(params::MOVING, false);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        let in_range = ctx.target_in_chase_range();
        let body = &*ctx.body;
        if in_range && body.grounded && !body.held && body.cooldown_ready() {
            return Some(StateKind::Chase);
        }
        if !body.grounded {
            return None;
        }
        let timing = &body.config.timing;
        if self.elapsed >= timing.idle_time_before_dive {
            return Some(StateKind::Dive);
        }
        if timing.wander_enabled && !in_range && self.elapsed >= timing.wander_delay {
            return Some(StateKind::Wander);
        }
        None
    }
}
