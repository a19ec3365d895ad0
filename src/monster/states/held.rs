use glam::Vec3;
use log::info;
use rand::Rng;

use crate::collaborators::params;
use crate::constants::HOLD_SHAKE_FRACTION;
use crate::monster::context::StateContext;
use crate::monster::events::MonsterEvent;
use crate::monster::machine::{State, StateKind};

/// Picked up by an interactor. Shakes near the end of the allowed hold and
/// then wrenches itself free.
#[derive(Debug, Default)]
pub struct Held {
    elapsed: f32,
    broken: bool,
}

impl Held {
    fn force_break_hold(&mut self, ctx: &mut StateContext<'_, '_>) {
        self.broken = true;
        info!("monster broke free after {:.2}s", self.elapsed);
        ctx.body.held = false;
        ctx.body.shake_offset = Vec3::ZERO;
        ctx.body.emit(MonsterEvent::HoldBroken);
    }
}

impl State for Held {
    fn kind(&self) -> StateKind {
        StateKind::Held
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.grounded = false;
        ctx.body.set_bool(params::GROUNDED, false);
        ctx.body.set_bool(params::HELD, true);
        ctx.body.set_agent_enabled(false);
        ctx.body.controller.reset_velocity();
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        if !ctx.body.held {
            return ctx.body.grounded.then_some(StateKind::Idle);
        }
        self.elapsed += dt;
        let max_hold = ctx.body.config.timing.max_hold_time;
        if self.elapsed >= max_hold {
            if !self.broken {
                self.force_break_hold(ctx);
            }
            return None;
        }
        if self.elapsed >= max_hold * HOLD_SHAKE_FRACTION {
            let amplitude = ctx.body.config.timing.hold_shake_amplitude;
            let rng = &mut ctx.body.rng;
            ctx.body.shake_offset = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            ) * amplitude;
        }
        None
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.shake_offset = Vec3::ZERO;
        ctx.body.set_bool(params::HELD, false);
        if !ctx.body.kinematic {
            ctx.body.set_agent_enabled(true);
        }
    }
}
