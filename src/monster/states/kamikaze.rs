use log::info;

use crate::collaborators::params;
use crate::monster::context::{MonsterBody, StateContext, WorldView};
use crate::monster::events::MonsterEvent;
use crate::monster::machine::{State, StateKind};

/// Animations that never report completion are cut off after this many
/// multiples of the configured duration.
const ANIMATION_GRACE: f32 = 2.0;

/// Self-destruct run: the explosion goes off at the fuse time and the
/// monster dies once the animation finishes.
#[derive(Debug, Default)]
pub struct Kamikaze {
    elapsed: f32,
    exploded: bool,
}

/// Emits the explosion and damage for every target in the blast radius.
pub fn detonate(body: &mut MonsterBody, world: &WorldView<'_>) {
    let position = body.pose().position;
    let radius = body.config.combat.explosion_radius;
    let damage = body.config.combat.explosion_damage;
    info!("monster exploded at {position:?}");
    body.emit(MonsterEvent::Exploded {
        position,
        radius,
        damage,
    });
    for target in world.targets.within(position, radius) {
        body.emit(MonsterEvent::DealtDamage {
            target,
            amount: damage,
        });
    }
}

impl Kamikaze {
    fn animation_done(&self, body: &MonsterBody) -> bool {
        let duration = body.config.combat.kamikaze_duration;
        if self.elapsed < duration {
            return false;
        }
        if self.elapsed >= duration * ANIMATION_GRACE {
            return true;
        }
        body.animator.as_deref().map_or(true, |a| {
            !a.is_in_state(params::KAMIKAZE) || a.normalized_time() >= 1.0
        })
    }
}

impl State for Kamikaze {
    fn kind(&self) -> StateKind {
        StateKind::Kamikaze
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.kamikaze = true;
        ctx.body.stop_agent();
        ctx.body.set_trigger(params::KAMIKAZE);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        self.elapsed += dt;
        if !self.exploded && self.elapsed >= ctx.body.config.combat.kamikaze_fuse {
            self.exploded = true;
            detonate(ctx.body, &ctx.world);
        }
        (self.exploded && self.animation_done(ctx.body)).then_some(StateKind::Dead)
    }
}
