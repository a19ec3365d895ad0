use log::debug;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::machine::{State, StateKind};

/// Rays for the obstruction check leave from slightly above the body.
const PROBE_HEIGHT: f32 = 0.05;

/// Forward lunge with the agent switched off.
#[derive(Debug, Default)]
pub struct Dive {
    elapsed: f32,
}

impl State for Dive {
    fn kind(&self) -> StateKind {
        StateKind::Dive
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.set_agent_enabled(false);
        ctx.body.set_trigger(params::DIVE);
        let forward = ctx.body.pose().forward();
        let speed = ctx.body.config.timing.dive_speed;
        ctx.body.controller.add_velocity(forward * speed);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        let timing = &ctx.body.config.timing;
        if self.elapsed >= timing.dive_duration {
            return Some(StateKind::Idle);
        }
        let pose = ctx.body.pose();
        let blocked = ctx.world.physics.raycast(
            pose.position + pose.up() * PROBE_HEIGHT,
            pose.forward(),
            timing.dive_obstruction_distance,
            ctx.body.config.locomotion.surface_layers(),
        );
        if let Some(hit) = blocked {
            debug!("dive obstructed at {:?}", hit.point);
            return Some(StateKind::Idle);
        }
        None
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.controller.reset_transient();
        ctx.body.set_agent_enabled(true);
    }
}
