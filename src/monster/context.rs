//! State shared between the monster and its behaviour states.

use glam::{Vec2, Vec3};
use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::events::MonsterEvent;
use crate::collaborators::{params, Animator, NavAgent, StepAudio, StepCue};
use crate::config::MonsterConfig;
use crate::controller::SpiderController;
use crate::health::Health;
use crate::legs::LegRig;
use crate::physics::PhysicsQuery;
use crate::pose::Pose;
use crate::targets::{TargetDirectory, TargetId};

/// External services a monster reads while ticking.
#[derive(Clone, Copy)]
pub struct WorldView<'w> {
    /// Collision world.
    pub physics: &'w dyn PhysicsQuery,
    /// Hunt targets.
    pub targets: &'w TargetDirectory,
}

impl<'w> WorldView<'w> {
    /// Bundles the two services.
    #[must_use]
    pub const fn new(physics: &'w dyn PhysicsQuery, targets: &'w TargetDirectory) -> Self {
        Self { physics, targets }
    }
}

/// Everything a monster owns apart from its state machine.
pub struct MonsterBody {
    /// Tuning.
    pub config: MonsterConfig,
    /// Hit points.
    pub health: Health,
    /// Body locomotion.
    pub controller: SpiderController,
    /// Leg rig.
    pub legs: LegRig,
    /// Optional navigation agent.
    pub agent: Option<Box<dyn NavAgent>>,
    /// Optional animation sink.
    pub animator: Option<Box<dyn Animator>>,
    /// Optional footstep sink.
    pub audio: Option<Box<dyn StepAudio>>,
    /// Cached target; resolved through the directory on every use.
    pub target: Option<TargetId>,
    /// Where the body steers when the agent has no waypoint to offer.
    pub destination: Option<Vec3>,
    /// Seconds until the next charge is allowed.
    pub attack_cooldown: f32,
    /// Standing on a surface.
    pub grounded: bool,
    /// Held by an interactor.
    pub held: bool,
    /// Health crossed the kamikaze threshold.
    pub kamikaze: bool,
    /// Body motion is driven from outside.
    pub kinematic: bool,
    /// Pickups are accepted.
    pub grabbable: bool,
    /// Behaviour states tick.
    pub ai_enabled: bool,
    /// Visual scale.
    pub scale: f32,
    /// Visual jitter while struggling in a hold.
    pub shake_offset: Vec3,
    /// Seeded from the config.
    pub rng: StdRng,
    /// Queued reactions, oldest first.
    pub events: Vec<MonsterEvent>,
}

impl std::fmt::Debug for MonsterBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonsterBody")
            .field("health", &self.health)
            .field("pose", &self.controller.pose())
            .field("target", &self.target)
            .field("grounded", &self.grounded)
            .field("held", &self.held)
            .field("kamikaze", &self.kamikaze)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl MonsterBody {
    pub(crate) fn new(config: MonsterConfig, pose: Pose) -> Self {
        let mask = config.locomotion.surface_layers();
        Self {
            health: Health::new(config.max_health),
            controller: SpiderController::new(config.locomotion.clone(), pose),
            legs: LegRig::new(config.legs.clone(), pose, mask),
            agent: None,
            animator: None,
            audio: None,
            target: None,
            destination: None,
            attack_cooldown: 0.0,
            grounded: false,
            held: false,
            kamikaze: false,
            kinematic: false,
            grabbable: true,
            ai_enabled: true,
            scale: 1.0,
            shake_offset: Vec3::ZERO,
            rng: StdRng::seed_from_u64(config.seed),
            events: Vec::new(),
            config,
        }
    }

    /// Body pose.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.controller.pose()
    }

    /// Queues an event.
    pub fn emit(&mut self, event: MonsterEvent) {
        self.events.push(event);
    }

    /// Attack cooldown has run out.
    #[must_use]
    pub const fn cooldown_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    /// Health fraction is at or below the kamikaze threshold.
    #[must_use]
    pub const fn below_kamikaze_threshold(&self) -> bool {
        !self.health.is_dead()
            && self.health.percentage() <= self.config.combat.kamikaze_threshold
    }

    /// Forwards a bool parameter to the animator, if any.
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.animator.as_mut().map_or_else(
            || trace!("no animator; {name}={value} skipped"),
            |animator| animator.set_bool(name, value),
        );
    }

    /// Forwards a trigger to the animator, if any.
    pub fn set_trigger(&mut self, name: &str) {
        self.animator.as_mut().map_or_else(
            || trace!("no animator; trigger {name} skipped"),
            |animator| animator.set_trigger(name),
        );
    }

    /// Clears every behaviour trigger on the animator.
    pub fn reset_triggers(&mut self) {
        if let Some(animator) = self.animator.as_mut() {
            for name in params::TRIGGERS {
                animator.reset_trigger(name);
            }
        }
    }

    /// Points the agent (and the fallback steering) at `destination`.
    pub fn navigate_to(&mut self, destination: Vec3) {
        self.destination = Some(destination);
        if let Some(agent) = self.agent.as_mut() {
            agent.set_destination(destination);
            if agent.is_stopped() {
                agent.resume();
            }
        }
    }

    /// Halts path following and clears the steering target.
    pub fn stop_agent(&mut self) {
        self.destination = None;
        if let Some(agent) = self.agent.as_mut() {
            agent.stop();
        }
    }

    /// Switches the agent; disabling also drops the steering target.
    pub fn set_agent_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.destination = None;
        }
        if let Some(agent) = self.agent.as_mut() {
            agent.set_enabled(enabled);
        }
    }

    /// Body-space movement input toward the next waypoint.
    ///
    /// Zero when there is nowhere to go, the agent is stopped or disabled,
    /// or the waypoint is within arrival distance.
    pub(crate) fn steering_input(&self) -> Vec2 {
        let Some(destination) = self.destination else {
            return Vec2::ZERO;
        };
        let waypoint = match self.agent.as_deref() {
            Some(agent) if !agent.is_enabled() || agent.is_stopped() => return Vec2::ZERO,
            Some(agent) => agent.next_waypoint().unwrap_or(destination),
            None => destination,
        };
        let local = self.pose().inverse_transform_point(waypoint);
        let planar = Vec2::new(local.x, local.z);
        if planar.length() <= self.config.timing.arrive_distance {
            Vec2::ZERO
        } else {
            planar.normalize_or_zero()
        }
    }
}

/// Forwards step sounds to the optional audio sink and records them.
pub(crate) struct CueRelay<'a> {
    pub sink: Option<&'a mut dyn StepAudio>,
    pub events: &'a mut Vec<MonsterEvent>,
}

impl StepAudio for CueRelay<'_> {
    fn play(&mut self, cue: StepCue, leg: usize, position: Vec3, pitch: f32) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.play(cue, leg, position, pitch);
        }
        self.events.push(MonsterEvent::Step { cue, leg });
    }
}

/// What a state sees while entering, ticking or exiting.
pub struct StateContext<'a, 'w> {
    /// The monster's own data.
    pub body: &'a mut MonsterBody,
    /// External services.
    pub world: WorldView<'w>,
}

impl StateContext<'_, '_> {
    /// Position of the cached target, if it still resolves.
    #[must_use]
    pub fn target_position(&self) -> Option<Vec3> {
        self.body.target.and_then(|id| self.world.targets.position(id))
    }

    /// Distance to the cached target, if it still resolves.
    #[must_use]
    pub fn distance_to_target(&self) -> Option<f32> {
        self.target_position()
            .map(|p| p.distance(self.body.pose().position))
    }

    /// Re-resolves the nearest target and caches it.
    pub fn acquire_target(&mut self) -> Option<TargetId> {
        self.body.target = self.world.targets.acquire(self.body.pose().position);
        self.body.target
    }

    /// Fresh acquisition followed by a chase-range check.
    pub fn target_in_chase_range(&mut self) -> bool {
        self.acquire_target();
        self.distance_to_target()
            .is_some_and(|d| d <= self.body.config.combat.chase_range)
    }
}
