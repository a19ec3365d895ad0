use log::info;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::events::MonsterEvent;
use crate::monster::machine::{State, StateKind};

/// Terminal state. After a delay the body shrinks away and reports that it
/// can be pooled.
#[derive(Debug, Default)]
pub struct Dead {
    elapsed: f32,
    pooled: bool,
}

impl State for Dead {
    fn kind(&self) -> StateKind {
        StateKind::Dead
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        let body = &mut *ctx.body;
        if !body.health.is_dead() {
            let remaining = body.health.current();
            body.health.damage(remaining);
        }
        body.set_agent_enabled(false);
        body.controller.reset_velocity();
        body.kinematic = true;
        body.grabbable = false;
        body.held = false;
        body.set_trigger(params::DEAD);
        info!("monster died at {:?}", body.pose().position);
        body.emit(MonsterEvent::Died);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        let timing = &ctx.body.config.timing;
        let shrinking = self.elapsed - timing.death_scale_delay;
        if shrinking < 0.0 {
            return None;
        }
        let duration = timing.scale_down_duration;
        let t = if duration > 0.0 {
            (shrinking / duration).min(1.0)
        } else {
            1.0
        };
        ctx.body.scale = 1.0 - t;
        if t >= 1.0 && !self.pooled {
            self.pooled = true;
            ctx.body.emit(MonsterEvent::ReadyForPool);
        }
        None
    }
}
