use glam::Vec3;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::machine::{State, StateKind};

/// Brief stagger after taking damage.
#[derive(Debug, Default)]
pub struct Hurt {
    elapsed: f32,
}

impl State for Hurt {
    fn kind(&self) -> StateKind {
        StateKind::Hurt
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.stop_agent();
        ctx.body.controller.reset_velocity();
        ctx.body.shake_offset = Vec3::ZERO;
        ctx.body.set_trigger(params::HURT);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        if self.elapsed < ctx.body.config.timing.hurt_duration {
            return None;
        }
        if ctx.target_in_chase_range() && ctx.body.grounded {
            Some(StateKind::Chase)
        } else {
            Some(StateKind::Idle)
        }
    }
}
