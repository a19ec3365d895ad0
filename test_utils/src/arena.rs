//! Collision worlds and a single-monster harness.

use glam::Vec3;
use skitter::{
    Layers, Monster, MonsterConfig, MonsterEvent, Pose, StateKind, StaticSurfaces, Surface,
    TargetDirectory, TargetId, TargetTag, WorldView,
};

/// Frame length used by [`Arena::tick`].
pub const FRAME_DT: f32 = 1.0 / 60.0;
/// Fixed-step length used by [`Arena::tick`].
pub const FIXED_DT: f32 = 1.0 / 50.0;

/// Infinite floor through the origin facing `+Y`.
///
/// # Examples
/// ```
/// use skitter::{Layers, PhysicsQuery};
/// let floor = test_utils::flat_floor();
/// assert!(floor.raycast(glam::Vec3::Y, glam::Vec3::NEG_Y, 2.0, Layers::ENVIRONMENT).is_some());
/// ```
#[must_use]
pub fn flat_floor() -> StaticSurfaces {
    StaticSurfaces::new(vec![Surface::plane(Vec3::ZERO, Vec3::Y, Layers::ENVIRONMENT)])
}

/// Floor plus a wall at `z = wall_z` facing back toward the origin.
#[must_use]
pub fn floor_with_wall(wall_z: f32) -> StaticSurfaces {
    StaticSurfaces::new(vec![
        Surface::plane(Vec3::ZERO, Vec3::Y, Layers::ENVIRONMENT),
        Surface::plane(Vec3::new(0.0, 0.0, wall_z), Vec3::NEG_Z, Layers::ENVIRONMENT),
    ])
}

/// One monster in a static world, ticked with fixed frame lengths.
#[derive(Debug)]
pub struct Arena {
    pub surfaces: StaticSurfaces,
    pub targets: TargetDirectory,
    pub monster: Monster,
    events: Vec<MonsterEvent>,
}

impl Arena {
    /// Monster at the origin on a flat floor.
    #[must_use]
    pub fn flat(config: MonsterConfig) -> Self {
        Self::new(flat_floor(), Monster::new(config, Pose::IDENTITY))
    }

    #[must_use]
    pub fn new(surfaces: StaticSurfaces, monster: Monster) -> Self {
        Self {
            surfaces,
            targets: TargetDirectory::new(),
            monster,
            events: Vec::new(),
        }
    }

    pub fn add_target(&mut self, tag: TargetTag, position: Vec3) -> TargetId {
        self.targets.insert(tag, position)
    }

    /// Places a player `distance` metres straight ahead of the monster.
    pub fn add_player_ahead(&mut self, distance: f32) -> TargetId {
        let pose = self.monster.pose();
        self.add_target(TargetTag::Player, pose.position + pose.forward() * distance)
    }

    /// One fixed step followed by one frame.
    pub fn tick(&mut self) {
        self.fixed(FIXED_DT);
        self.frame(FRAME_DT);
    }

    pub fn fixed(&mut self, dt: f32) {
        self.monster
            .fixed_tick(WorldView::new(&self.surfaces, &self.targets), dt);
    }

    pub fn frame(&mut self, dt: f32) {
        self.monster
            .frame_tick(WorldView::new(&self.surfaces, &self.targets), dt);
        self.events.extend(self.monster.drain_events());
    }

    /// Ticks until `seconds` of frame time have elapsed.
    pub fn run_for(&mut self, seconds: f32) {
        let frames = (seconds / FRAME_DT).ceil() as usize;
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Ticks until the monster reaches `kind` or `max_seconds` pass.
    /// Returns whether the state was reached.
    pub fn run_until(&mut self, kind: StateKind, max_seconds: f32) -> bool {
        let frames = (max_seconds / FRAME_DT).ceil() as usize;
        for _ in 0..frames {
            if self.monster.state() == kind {
                return true;
            }
            self.tick();
        }
        self.monster.state() == kind
    }

    pub fn damage(&mut self, amount: f32) -> f32 {
        let dealt = self
            .monster
            .apply_damage(WorldView::new(&self.surfaces, &self.targets), amount);
        self.events.extend(self.monster.drain_events());
        dealt
    }

    pub fn set_state(&mut self, kind: StateKind) -> bool {
        let changed = self
            .monster
            .set_state(WorldView::new(&self.surfaces, &self.targets), kind);
        self.events.extend(self.monster.drain_events());
        changed
    }

    pub fn pickup(&mut self) -> bool {
        let held = self
            .monster
            .pickup(WorldView::new(&self.surfaces, &self.targets));
        self.events.extend(self.monster.drain_events());
        held
    }

    pub fn release(&mut self) {
        self.monster
            .release(WorldView::new(&self.surfaces, &self.targets));
        self.events.extend(self.monster.drain_events());
    }

    pub fn explode(&mut self) {
        self.monster
            .explode(WorldView::new(&self.surfaces, &self.targets));
        self.events.extend(self.monster.drain_events());
    }

    pub fn reset(&mut self) {
        self.monster
            .reset(WorldView::new(&self.surfaces, &self.targets));
        self.events.extend(self.monster.drain_events());
    }

    /// Every event collected so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[MonsterEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of collected events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&MonsterEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}
