use log::debug;

use crate::collaborators::params;
use crate::monster::context::StateContext;
use crate::monster::events::MonsterEvent;
use crate::monster::machine::{State, StateKind};

/// Melee swing. The hit lands once, part-way through.
#[derive(Debug, Default)]
pub struct Attack {
    elapsed: f32,
    hit: bool,
}

impl State for Attack {
    fn kind(&self) -> StateKind {
        StateKind::Attack
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        ctx.body.stop_agent();
        ctx.body.set_trigger(params::ATTACK);
    }

    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind> {
        if ctx.body.below_kamikaze_threshold() {
            return Some(StateKind::Kamikaze);
        }
        let combat = ctx.body.config.combat.clone();
        let in_range = ctx
            .distance_to_target()
            .is_some_and(|d| d <= combat.attack_range);
        if !in_range || !ctx.body.grounded || ctx.body.held {
            return Some(StateKind::Chase);
        }

        self.elapsed += dt;
        if !self.hit && self.elapsed >= combat.attack_hit_delay {
            self.hit = true;
            if let Some(target) = ctx.body.target {
                debug!("attack hit {target:?} for {}", combat.attack_damage);
                ctx.body.emit(MonsterEvent::AttackHit { target });
                ctx.body.emit(MonsterEvent::DealtDamage {
                    target,
                    amount: combat.attack_damage,
                });
            }
        }
        (self.elapsed >= combat.attack_duration).then_some(StateKind::Chase)
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_, '_>) {
        if self.hit {
            ctx.body.attack_cooldown = ctx.body.config.combat.attack_cooldown;
        }
    }
}
