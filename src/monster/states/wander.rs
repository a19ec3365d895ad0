use glam::Vec3;
use rand::Rng;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::machine::{State, StateKind};

/// Aimless stroll to a random nearby point.
#[derive(Debug, Default)]
pub struct Wander {
    elapsed: f32,
    destination: Option<Vec3>,
}

impl State for Wander {
    fn kind(&self) -> StateKind {
        StateKind::Wander
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        let body = &mut *ctx.body;
        let timing = &body.config.timing;
        let radius = timing.wander_radius;
        // Leave at least one arrival radius to walk.
        let nearest = (timing.arrive_distance * 2.0).min(radius);
        let angle = body.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = body.rng.gen_range(nearest..=radius);
        let local = Vec3::new(angle.sin(), 0.0, angle.cos()) * distance;
        let destination = body.pose().transform_point(local);
        self.destination = Some(destination);
        body.set_bool(params::MOVING, true);
        body.navigate_to(destination);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        if ctx.target_in_chase_range() && ctx.body.cooldown_ready() {
            return Some(StateKind::Chase);
        }
        let timing = &ctx.body.config.timing;
        if self.elapsed >= timing.wander_timeout {
            return Some(StateKind::Idle);
        }
        let remaining = match ctx.body.agent.as_deref() {
            Some(agent) if agent.path_pending() => return None,
            Some(agent) => Some(agent.remaining_distance()),
            None => self
                .destination
                .map(|d| d.distance(ctx.body.pose().position)),
        };
        remaining
            .is_some_and(|r| r <= timing.arrive_distance)
            .then_some(StateKind::Idle)
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.set_bool(params::MOVING, false);
        ctx.body.stop_agent();
    }
}
