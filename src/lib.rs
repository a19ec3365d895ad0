#![cfg_attr(docsrs, feature(doc_cfg))]
//! Shadow-monster AI on top of surface-following spider locomotion.
//!
//! A [`Monster`] runs a finite-state behaviour (idle, chase, charge, attack,
//! kamikaze, hurt, dive, held, dead, wander) and walks on arbitrary surfaces
//! with a procedural leg rig. Collision, navigation, animation and audio are
//! reached through the traits in [`physics`] and [`collaborators`], so the
//! core runs headless; [`plugin::SkitterPlugin`] drives it from Bevy.
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod health;
pub mod legs;
pub mod logging;
pub mod monster;
pub mod physics;
pub mod plugin;
pub mod pose;
pub mod targets;
pub mod vector_math;
pub use constants::*;

pub use collaborators::{Animator, NavAgent, StepAudio, StepCue};
pub use config::MonsterConfig;
pub use controller::SpiderController;
pub use error::ConfigError;
pub use health::{Health, HealthEvent, SubscriptionId};
pub use legs::{Leg, LegRig};
pub use logging::init as init_logging;
pub use monster::{Monster, MonsterEvent, StateKind, WorldView};
pub use physics::{Layers, PhysicsQuery, RayHit, StaticSurfaces, Surface};
pub use plugin::{MonsterActor, MonsterSignal, SkitterPlugin, SurfaceWorld};
pub use pose::Pose;
pub use targets::{TargetDirectory, TargetId, TargetTag};
pub use vector_math::{look_rotation, vec_normalize};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use skitter::prelude::*;
    //! let world = StaticSurfaces::new(vec![Surface::plane(
    //!     glam::Vec3::ZERO,
    //!     glam::Vec3::Y,
    //!     Layers::ENVIRONMENT,
    //! )]);
    //! let targets = TargetDirectory::new();
    //! let mut monster = Monster::new(MonsterConfig::default(), Pose::IDENTITY);
    //! monster.fixed_tick(WorldView::new(&world, &targets), 0.02);
    //! monster.frame_tick(WorldView::new(&world, &targets), 0.016);
    //! ```

    pub use crate::config::MonsterConfig;
    pub use crate::monster::{Monster, MonsterEvent, StateKind, WorldView};
    pub use crate::physics::{Layers, PhysicsQuery, StaticSurfaces, Surface};
    pub use crate::pose::Pose;
    pub use crate::targets::{TargetDirectory, TargetTag};
}
