//! Collision queries consumed by locomotion and the leg rig.
//!
//! The simulation never owns a physics engine. Everything it needs is a ray
//! query against a layer mask, expressed by [`PhysicsQuery`]. Arc-casts and
//! arc chains are built on top of that single primitive, and
//! [`StaticSurfaces`] provides a small self-contained implementation used by
//! the CLI and tests.

mod arc;
mod surfaces;

use glam::Vec3;

pub use arc::{arc_cast, ArcCast, ArcChain};
pub use surfaces::{Surface, StaticSurfaces};

bitflags::bitflags! {
    /// Collision layers a query may be restricted to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Static level geometry.
        const ENVIRONMENT = 0x0000_0001;
        /// Monster bodies.
        const MONSTER     = 0x0000_0002;
        /// The player.
        const PLAYER      = 0x0000_0004;
        /// Dynamic props.
        const PROP        = 0x0000_0008;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::ENVIRONMENT
    }
}

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space contact point.
    pub point: Vec3,
    /// Unit surface normal at the contact.
    pub normal: Vec3,
    /// Distance travelled along the ray.
    pub distance: f32,
}

/// Ray queries against the collision world.
pub trait PhysicsQuery: Send + Sync {
    /// Casts a ray and returns the nearest hit within `max_distance`.
    ///
    /// `direction` need not be normalised; implementations normalise it and
    /// return `None` for zero-length directions.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Layers)
        -> Option<RayHit>;
}

impl<T: PhysicsQuery + ?Sized> PhysicsQuery for Box<T> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }
}
