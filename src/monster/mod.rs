//! The monster: a state machine steering a surface-walking leg rig.
//!
//! A [`Monster`] owns its body (health, locomotion, legs and optional
//! collaborators) and a [`StateMachine`]. Hosts call
//! [`Monster::frame_tick`] once per rendered frame and
//! [`Monster::fixed_tick`] at the physics rate, passing a [`WorldView`] with
//! the collision world and target directory. Reactions are queued as
//! [`MonsterEvent`]s and handed over by [`Monster::drain_events`].

mod context;
mod events;
mod machine;
mod states;

use glam::Vec3;
use log::{debug, info};

pub use context::{MonsterBody, StateContext, WorldView};
pub use events::MonsterEvent;
pub use machine::{State, StateKind, StateMachine};

use crate::collaborators::{params, Animator, NavAgent, StepAudio};
use crate::config::MonsterConfig;
use crate::health::{Health, HealthEvent, SubscriptionId};
use crate::legs::{Leg, StepDrive};
use crate::pose::Pose;
use crate::targets::{TargetId, TargetTag};
use context::CueRelay;

/// One monster instance.
#[derive(Debug)]
pub struct Monster {
    body: MonsterBody,
    machine: StateMachine,
}

impl Monster {
    /// Creates a monster in Idle at `pose`. The Idle entry actions run on the
    /// first tick or command, after collaborators are attached.
    #[must_use]
    pub fn new(config: MonsterConfig, pose: Pose) -> Self {
        Self {
            body: MonsterBody::new(config, pose),
            machine: StateMachine::default(),
        }
    }

    /// Attaches a navigation agent.
    #[must_use]
    pub fn with_agent(mut self, agent: impl NavAgent + 'static) -> Self {
        self.body.agent = Some(Box::new(agent));
        self
    }

    /// Attaches an animation parameter sink.
    #[must_use]
    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.body.animator = Some(Box::new(animator));
        self
    }

    /// Attaches a footstep audio sink.
    #[must_use]
    pub fn with_audio(mut self, audio: impl StepAudio + 'static) -> Self {
        self.body.audio = Some(Box::new(audio));
        self
    }

    fn with_context<R>(
        &mut self,
        world: WorldView<'_>,
        f: impl FnOnce(&mut StateMachine, &mut StateContext<'_, '_>) -> R,
    ) -> R {
        let mut ctx = StateContext {
            body: &mut self.body,
            world,
        };
        f(&mut self.machine, &mut ctx)
    }

    /// Per-frame update: cooldowns, behaviour, steering, body motion and
    /// leg steps, in that order.
    pub fn frame_tick(&mut self, world: WorldView<'_>, dt: f32) {
        self.body.attack_cooldown = (self.body.attack_cooldown - dt).max(0.0);
        let run_ai = self.body.ai_enabled || self.machine.kind() == StateKind::Dead;
        if run_ai {
            self.with_context(world, |machine, ctx| machine.tick(ctx, dt));
        }

        let body = &mut self.body;
        if !body.held && !body.kinematic {
            let input = body.steering_input();
            let blocker = world
                .targets
                .nearest_tagged(TargetTag::Player, body.pose().position)
                .map(|(_, p)| p);
            body.controller.apply_movement_direction(input, dt, blocker);
            body.controller.frame_tick(world.physics, dt);
        }

        let mut relay = CueRelay {
            sink: body.audio.as_deref_mut().map(|a| a as &mut dyn StepAudio),
            events: &mut body.events,
        };
        let mut drive = StepDrive {
            physics: world.physics,
            body: body.controller.pose(),
            velocity: body.controller.velocity(),
            speed_progress: body.controller.speed_progress(),
            rng: &mut body.rng,
            audio: Some(&mut relay),
        };
        body.legs.frame_tick(&mut drive, dt);
    }

    /// Fixed-rate update: friction, ground probe and orbit solving.
    pub fn fixed_tick(&mut self, world: WorldView<'_>, dt: f32) {
        let body = &mut self.body;
        body.controller.fixed_tick(dt);
        body.grounded =
            !body.held && !body.kinematic && body.controller.probe_ground(world.physics);
        let grounded = body.grounded;
        body.set_bool(params::GROUNDED, grounded);
        let pose = body.controller.pose();
        body.legs.fixed_tick(world.physics, pose);
    }

    /// Applies damage and runs the cross-cutting reactions.
    ///
    /// Death overrides everything. Dropping to the kamikaze threshold marks
    /// the monster and, unless held, sends it into Kamikaze. Any other
    /// non-zero damage staggers it into Hurt unless it is held or already in
    /// Hurt or Kamikaze. Returns the damage actually dealt.
    pub fn apply_damage(&mut self, world: WorldView<'_>, amount: f32) -> f32 {
        if self.machine.kind() == StateKind::Dead {
            return 0.0;
        }
        let dealt = self.body.health.damage(amount);
        if self.body.health.is_dead() {
            info!("lethal damage {dealt}");
            self.transition(world, StateKind::Dead);
        } else if self.body.below_kamikaze_threshold() {
            self.body.kamikaze = true;
            if !self.body.held {
                info!("health {:.1} below kamikaze threshold", self.body.health.current());
                self.transition(world, StateKind::Kamikaze);
            }
        } else if dealt > 0.0
            && !self.body.held
            && !matches!(self.machine.kind(), StateKind::Hurt | StateKind::Kamikaze)
        {
            self.transition(world, StateKind::Hurt);
        }
        dealt
    }

    /// Restores health and returns the amount healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.body.health.heal(amount)
    }

    /// Grab notification from an interactor.
    ///
    /// A grab while Held lingers after a mid-air release or break restarts
    /// the hold with a fresh timer.
    pub fn pickup(&mut self, world: WorldView<'_>) -> bool {
        if !self.body.grabbable {
            return false;
        }
        if self.body.held {
            return true;
        }
        self.body.held = true;
        if self.machine.kind() == StateKind::Held {
            debug!("re-grabbed before landing");
            self.with_context(world, |machine, ctx| machine.force_state(ctx, StateKind::Held));
        } else {
            self.transition(world, StateKind::Held);
        }
        true
    }

    /// Release notification. Returns to Idle straight away when the monster
    /// lands on a surface; otherwise Held waits for the ground.
    pub fn release(&mut self, world: WorldView<'_>) {
        if !self.body.held {
            return;
        }
        self.body.held = false;
        self.body.controller.reset_velocity();
        self.body.grounded = self.body.controller.probe_ground(world.physics);
        if self.body.grounded {
            self.transition(world, StateKind::Idle);
        }
    }

    /// Requests a state change. A request for the active state, or any
    /// request while dead, is ignored.
    pub fn set_state(&mut self, world: WorldView<'_>, kind: StateKind) -> bool {
        self.transition(world, kind)
    }

    /// Detonates immediately and dies.
    pub fn explode(&mut self, world: WorldView<'_>) {
        if self.machine.kind() == StateKind::Dead {
            return;
        }
        self.body.kamikaze = true;
        states::detonate(&mut self.body, &world);
        self.transition(world, StateKind::Dead);
    }

    /// Back to a fresh Idle monster: full health, no velocity, unit scale.
    /// Works from any state, Dead included.
    pub fn reset(&mut self, world: WorldView<'_>) {
        let body = &mut self.body;
        body.health.restore_full();
        body.controller.reset_velocity();
        body.scale = 1.0;
        body.held = false;
        body.kamikaze = false;
        body.kinematic = false;
        body.grabbable = true;
        body.shake_offset = Vec3::ZERO;
        body.attack_cooldown = 0.0;
        body.target = None;
        let pose = body.controller.pose();
        body.legs.reset(pose);
        body.set_agent_enabled(true);
        debug!("monster reset at {:?}", pose.position);
        self.with_context(world, |machine, ctx| machine.force_state(ctx, StateKind::Idle));
    }

    /// Switches behaviour and navigation on or off. Dead keeps ticking.
    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.body.ai_enabled = enabled;
        self.body.set_agent_enabled(enabled);
        if !enabled {
            self.body.stop_agent();
        }
    }

    /// Adds an external impulse to the body.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        self.body.controller.add_velocity(velocity);
    }

    /// Teleports the body, e.g. while an interactor carries it.
    pub const fn set_pose(&mut self, pose: Pose) {
        self.body.controller.set_pose(pose);
    }

    fn transition(&mut self, world: WorldView<'_>, kind: StateKind) -> bool {
        self.with_context(world, |machine, ctx| machine.change_state(ctx, kind))
    }

    /// Nearest hunt target right now, without caching it.
    #[must_use]
    pub fn closest_target(&self, world: WorldView<'_>) -> Option<TargetId> {
        world.targets.acquire(self.body.pose().position)
    }

    /// Distance to the cached target, if it still resolves.
    #[must_use]
    pub fn distance_to_target(&self, world: WorldView<'_>) -> Option<f32> {
        let target = world.targets.position(self.body.target?)?;
        Some(target.distance(self.body.pose().position))
    }

    /// Cached hunt target.
    #[must_use]
    pub const fn target(&self) -> Option<TargetId> {
        self.body.target
    }

    /// Whether the last ground check found a surface.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    /// Whether an interactor is holding the monster.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.body.held
    }

    /// Whether health has crossed the kamikaze threshold.
    #[must_use]
    pub const fn is_kamikaze(&self) -> bool {
        self.body.kamikaze
    }

    /// Whether [`Monster::pickup`] is currently accepted.
    #[must_use]
    pub const fn is_grabbable(&self) -> bool {
        self.body.grabbable
    }

    /// Active behaviour state.
    #[must_use]
    pub fn state(&self) -> StateKind {
        self.machine.kind()
    }

    /// Read-only view of the health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.body.health
    }

    /// Registers a health observer. Damage still goes through
    /// [`Monster::apply_damage`].
    pub fn subscribe_health<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&HealthEvent) + Send + Sync + 'static,
    {
        self.body.health.subscribe(observer)
    }

    /// Drops a health observer. Returns `false` when the id was unknown.
    pub fn unsubscribe_health(&mut self, id: SubscriptionId) -> bool {
        self.body.health.unsubscribe(id)
    }

    /// Body pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.body.pose()
    }

    /// Visual scale; shrinks to zero after death.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.body.scale
    }

    /// Body velocity in world space.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.body.controller.velocity()
    }

    /// Visual jitter applied while struggling in a hold.
    #[must_use]
    pub const fn shake_offset(&self) -> Vec3 {
        self.body.shake_offset
    }

    /// Seconds until the next charge is allowed.
    #[must_use]
    pub const fn attack_cooldown(&self) -> f32 {
        self.body.attack_cooldown
    }

    /// Leg rig state.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        self.body.legs.legs()
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> &MonsterConfig {
        &self.body.config
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<MonsterEvent> {
        std::mem::take(&mut self.body.events)
    }

    /// Marks the monster grounded without waiting for a fixed tick.
    pub const fn set_grounded(&mut self, grounded: bool) {
        self.body.grounded = grounded;
    }
}
