use log::debug;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::machine::{State, StateKind};

/// Follows the target until it is close enough to charge.
#[derive(Debug, Default)]
pub struct Chase {
    stuck: f32,
}

impl State for Chase {
    fn kind(&self) -> StateKind {
        StateKind::Chase
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.acquire_target();
        ctx.body.set_bool(params::MOVING, true);
        if let Some(destination) = ctx.target_position() {
            ctx.body.navigate_to(destination);
        }
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        let (Some(position), Some(distance)) = (ctx.target_position(), ctx.distance_to_target())
        else {
            debug!("chase target lost");
            return Some(StateKind::Idle);
        };
        let combat = &ctx.body.config.combat;
        if distance > combat.chase_range {
            return Some(StateKind::Idle);
        }
        if distance <= combat.attack_range {
            self.stuck = 0.0;
            return ctx.body.cooldown_ready().then_some(StateKind::Charge);
        }

        ctx.body.navigate_to(position);
        let speed = ctx
            .body
            .agent
            .as_deref()
            .map_or_else(|| ctx.body.controller.velocity().length(), |a| a.speed());
        let timing = &ctx.body.config.timing;
        if speed < timing.stuck_speed {
            self.stuck += dt;
            if self.stuck >= timing.stuck_timeout {
                debug!("chase stuck for {:.1}s", self.stuck);
                return Some(StateKind::Idle);
            }
        } else {
            self.stuck = 0.0;
        }
        None
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.set_bool(params::MOVING, false);
    }
}
