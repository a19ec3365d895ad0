//! Headless arena runner: one monster, a floor and a player, driven by Bevy.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use glam::Vec3;
use log::info;
use skitter::{
    init_logging, Layers, Monster, MonsterActor, MonsterConfig, Pose, SkitterPlugin,
    StaticSurfaces, Surface, SurfaceWorld, TargetDirectory, TargetTag,
};

/// Headless shadow-monster arena
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,
    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// JSON tuning file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the configured random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Monsters to spawn
    #[arg(short, long, default_value_t = 3)]
    monsters: u32,
}

/// Floor with a wall along the far edge, so dives and chases have something
/// to climb.
fn arena() -> StaticSurfaces {
    StaticSurfaces::new(vec![
        Surface::plane(Vec3::ZERO, Vec3::Y, Layers::ENVIRONMENT),
        Surface::rect(
            Vec3::new(0.0, 2.0, 10.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Layers::ENVIRONMENT,
        ),
        Surface::cuboid(
            Vec3::new(-1.0, 0.0, 3.0),
            Vec3::new(1.0, 0.5, 4.0),
            Layers::ENVIRONMENT | Layers::PROP,
        ),
    ])
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => MonsterConfig::load(path)
            .with_context(|| format!("loading monster config {}", path.display()))?,
        None => MonsterConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut targets = TargetDirectory::new();
    targets.insert(TargetTag::Player, Vec3::new(0.0, 0.0, 6.0));
    targets.insert(TargetTag::Priority, Vec3::new(4.0, 0.0, 8.0));

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SurfaceWorld::new(arena()))
        .insert_resource(targets)
        .add_plugins(SkitterPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            args.frame_ms,
        )));

    for index in 0..args.monsters {
        let mut monster_config = config.clone();
        monster_config.seed = config.seed.wrapping_add(u64::from(index));
        let x = index as f32 * 1.5 - 1.5;
        let pose = Pose::from_position(Vec3::new(x, 0.0, -2.0));
        app.world_mut().spawn((
            MonsterActor(Monster::new(monster_config, pose)),
            Transform::from_translation(pose.position),
        ));
    }

    info!("simulating {} monsters for {} frames", args.monsters, args.frames);
    for _ in 0..args.frames {
        app.update();
    }

    let mut query = app.world_mut().query::<(Entity, &MonsterActor)>();
    for (entity, actor) in query.iter(app.world()) {
        info!(
            "{entity:?}: {} at {:?}, health {:.0}/{:.0}",
            actor.state(),
            actor.pose().position,
            actor.health().current(),
            actor.health().max()
        );
    }
    Ok(())
}
