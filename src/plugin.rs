//! Bevy integration.
//!
//! [`SkitterPlugin`] drives every [`MonsterActor`] from the app schedules:
//! behaviour, steering and leg steps in `Update`, friction, ground probing
//! and orbit solving in `FixedUpdate`. Monster poses are copied into
//! `Transform` after each frame tick, and queued [`MonsterEvent`]s are
//! re-published as [`MonsterSignal`] observer events.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, info, trace};

use crate::monster::{Monster, MonsterEvent, WorldView};
use crate::physics::{PhysicsQuery, StaticSurfaces};
use crate::targets::TargetDirectory;

/// Collision world shared by every monster.
#[derive(Resource)]
pub struct SurfaceWorld(pub Box<dyn PhysicsQuery>);

impl Default for SurfaceWorld {
    fn default() -> Self {
        Self(Box::new(StaticSurfaces::default()))
    }
}

impl SurfaceWorld {
    /// Wraps any collision backend.
    #[must_use]
    pub fn new(physics: impl PhysicsQuery + 'static) -> Self {
        Self(Box::new(physics))
    }
}

/// Component wrapping a simulated monster.
#[derive(Component, Debug, Deref, DerefMut)]
pub struct MonsterActor(pub Monster);

/// A [`MonsterEvent`] tagged with the entity that produced it.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MonsterSignal {
    /// Entity carrying the [`MonsterActor`].
    pub monster: Entity,
    /// What happened.
    pub signal: MonsterEvent,
}

fn sync_transform(monster: &Monster, transform: &mut Transform) {
    let pose = monster.pose();
    transform.translation = pose.position + monster.shake_offset();
    transform.rotation = pose.rotation;
    transform.scale = Vec3::splat(monster.scale());
}

/// Per-frame monster update.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn monster_frame_system(
    time: Res<Time>,
    surfaces: Res<SurfaceWorld>,
    targets: Res<TargetDirectory>,
    mut monsters: Query<(Entity, &mut MonsterActor, &mut Transform)>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();
    let world = WorldView::new(surfaces.0.as_ref(), &targets);
    for (entity, mut actor, mut transform) in &mut monsters {
        actor.frame_tick(world, dt);
        sync_transform(&actor, &mut transform);
        for signal in actor.drain_events() {
            commands.trigger(MonsterSignal {
                monster: entity,
                signal,
            });
        }
    }
}

/// Fixed-rate monster update.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn monster_fixed_system(
    time: Res<Time>,
    surfaces: Res<SurfaceWorld>,
    targets: Res<TargetDirectory>,
    mut monsters: Query<&mut MonsterActor>,
) {
    let dt = time.delta_secs();
    let world = WorldView::new(surfaces.0.as_ref(), &targets);
    for mut actor in &mut monsters {
        actor.fixed_tick(world, dt);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_monster_signal(event: On<MonsterSignal>) {
    let MonsterSignal { monster, signal } = event.event();
    match signal {
        MonsterEvent::Step { .. } => trace!("{monster:?}: {signal:?}"),
        MonsterEvent::StateEntered(_) | MonsterEvent::StateExited(_) => {
            debug!("{monster:?}: {signal:?}");
        }
        _ => info!("{monster:?}: {signal:?}"),
    }
}

/// Installs monster resources, systems and the signal logger.
#[derive(Debug, Default)]
pub struct SkitterPlugin;

impl Plugin for SkitterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SurfaceWorld>();
        app.init_resource::<TargetDirectory>();
        app.add_observer(log_monster_signal);
        app.add_systems(Update, monster_frame_system);
        app.add_systems(FixedUpdate, monster_fixed_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonsterConfig;
    use crate::monster::StateKind;
    use crate::physics::{Layers, Surface};
    use crate::pose::Pose;
    use crate::targets::TargetTag;
    use bevy::time::TimeUpdateStrategy;
    use rstest::rstest;
    use std::time::Duration;

    #[derive(Resource, Default, Debug)]
    struct Captured(Vec<MonsterSignal>);

    #[expect(
        clippy::needless_pass_by_value,
        reason = "Observer systems must take On<T> by value."
    )]
    fn record(event: On<MonsterSignal>, mut captured: ResMut<Captured>) {
        captured.0.push(*event.event());
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SurfaceWorld::new(StaticSurfaces::new(vec![Surface::plane(
            Vec3::ZERO,
            Vec3::Y,
            Layers::ENVIRONMENT,
        )])));
        app.add_plugins(SkitterPlugin);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)));
        app.init_resource::<Captured>();
        app.add_observer(record);
        app
    }

    #[rstest]
    fn plugin_initialises_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SkitterPlugin);
        assert!(app.world().contains_resource::<SurfaceWorld>());
        assert!(app.world().contains_resource::<TargetDirectory>());
    }

    #[rstest]
    fn monsters_publish_signals_and_sync_transforms() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn((
                MonsterActor(Monster::new(MonsterConfig::default(), Pose::IDENTITY)),
                Transform::default(),
            ))
            .id();
        for _ in 0..3 {
            app.update();
        }
        let captured = &app.world().resource::<Captured>().0;
        assert!(captured.contains(&MonsterSignal {
            monster: entity,
            signal: MonsterEvent::StateEntered(StateKind::Idle),
        }));
        let transform = app.world().get::<Transform>(entity).copied();
        assert_eq!(transform.map(|t| t.scale), Some(Vec3::ONE));
    }

    #[rstest]
    fn nearby_player_pulls_monster_into_chase() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<TargetDirectory>()
            .insert(TargetTag::Player, Vec3::new(0.0, 0.0, 5.0));
        let entity = app
            .world_mut()
            .spawn((
                MonsterActor(Monster::new(MonsterConfig::default(), Pose::IDENTITY)),
                Transform::default(),
            ))
            .id();
        for _ in 0..10 {
            app.update();
        }
        let state = app.world().get::<MonsterActor>(entity).map(|m| m.state());
        assert_eq!(state, Some(StateKind::Chase));
    }
}
