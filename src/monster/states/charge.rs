use log::debug;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::machine::{State, StateKind};

/// Wind-up before an attack or a kamikaze run.
#[derive(Debug, Default)]
pub struct Charge {
    elapsed: f32,
    /// Distance to the target when the charge began.
    start_distance: Option<f32>,
}

impl State for Charge {
    fn kind(&self) -> StateKind {
        StateKind::Charge
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        self.start_distance = ctx.distance_to_target();
        ctx.body.stop_agent();
        ctx.body.set_trigger(params::CHARGE);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        let combat = &ctx.body.config.combat;
        if self.elapsed < combat.charge_delay {
            return None;
        }
        if ctx.body.kamikaze || ctx.body.below_kamikaze_threshold() {
            return Some(StateKind::Kamikaze);
        }
        let now = ctx.distance_to_target();
        debug!("charge resolved: {:?} m -> {now:?} m", self.start_distance);
        match now {
            Some(d) if d <= combat.attack_range => Some(StateKind::Attack),
            _ => Some(StateKind::Idle),
        }
    }
}
