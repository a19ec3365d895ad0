//! In-memory collision world made of analytic surfaces.
//!
//! This world stores planes, bounded rectangles and axis-aligned boxes and
//! answers ray queries without any external runtime. Planar surfaces are
//! one-sided: rays approaching from behind pass through.

use glam::Vec3;

use super::{Layers, PhysicsQuery, RayHit};
use crate::vector_math::vec_normalize;

/// Single collidable shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Infinite one-sided plane.
    Plane {
        /// Any point on the plane.
        point: Vec3,
        /// Unit normal of the solid side.
        normal: Vec3,
        /// Collision layers.
        layers: Layers,
    },
    /// One-sided rectangle spanned by two orthogonal half-extent vectors.
    Rect {
        /// Centre of the rectangle.
        center: Vec3,
        /// Unit normal of the solid side.
        normal: Vec3,
        /// First half extent.
        half_u: Vec3,
        /// Second half extent.
        half_v: Vec3,
        /// Collision layers.
        layers: Layers,
    },
    /// Solid axis-aligned box.
    Cuboid {
        /// Lowest corner.
        min: Vec3,
        /// Highest corner.
        max: Vec3,
        /// Collision layers.
        layers: Layers,
    },
}

impl Surface {
    /// Plane through `point`; `normal` need not be unit length.
    #[must_use]
    pub fn plane(point: Vec3, normal: Vec3, layers: Layers) -> Self {
        Self::Plane {
            point,
            normal: vec_normalize(normal),
            layers,
        }
    }

    /// Rectangle whose normal is `half_u × half_v`.
    #[must_use]
    pub fn rect(center: Vec3, half_u: Vec3, half_v: Vec3, layers: Layers) -> Self {
        Self::Rect {
            center,
            normal: vec_normalize(half_u.cross(half_v)),
            half_u,
            half_v,
            layers,
        }
    }

    /// Box spanning two opposite corners in any order.
    #[must_use]
    pub fn cuboid(a: Vec3, b: Vec3, layers: Layers) -> Self {
        Self::Cuboid {
            min: a.min(b),
            max: a.max(b),
            layers,
        }
    }

    const fn layers(&self) -> Layers {
        match self {
            Self::Plane { layers, .. } | Self::Rect { layers, .. } | Self::Cuboid { layers, .. } => {
                *layers
            }
        }
    }

    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<(f32, Vec3)> {
        match *self {
            Self::Plane { point, normal, .. } => plane_hit(origin, dir, point, normal),
            Self::Rect {
                center,
                normal,
                half_u,
                half_v,
                ..
            } => {
                let (t, n) = plane_hit(origin, dir, center, normal)?;
                let local = origin + dir * t - center;
                let within = |axis: Vec3| {
                    let len_sq = axis.length_squared();
                    len_sq > 0.0 && local.dot(axis).abs() <= len_sq
                };
                (within(half_u) && within(half_v)).then_some((t, n))
            }
            Self::Cuboid { min, max, .. } => box_hit(origin, dir, min, max),
        }
    }
}

fn plane_hit(origin: Vec3, dir: Vec3, point: Vec3, normal: Vec3) -> Option<(f32, Vec3)> {
    let denom = dir.dot(normal);
    if denom >= -f32::EPSILON {
        return None;
    }
    let t = (point - origin).dot(normal) / denom;
    (t >= 0.0).then_some((t, normal))
}

fn box_hit(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;
    let slabs = [
        (origin.x, dir.x, min.x, max.x, Vec3::X),
        (origin.y, dir.y, min.y, max.y, Vec3::Y),
        (origin.z, dir.z, min.z, max.z, Vec3::Z),
    ];
    for (o, d, lo, hi, axis) in slabs {
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
        let face = axis * -d.signum();
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = face;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    // Origins inside the box report no hit.
    (t_enter >= 0.0).then_some((t_enter, normal))
}

/// Collection of [`Surface`]s implementing [`PhysicsQuery`].
#[derive(Debug, Clone, Default)]
pub struct StaticSurfaces {
    surfaces: Vec<Surface>,
}

impl StaticSurfaces {
    /// World made of `surfaces`.
    #[must_use]
    pub const fn new(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    /// Adds a surface.
    pub fn push(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    /// Number of surfaces.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// `true` when the world holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl PhysicsQuery for StaticSurfaces {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        let dir = vec_normalize(direction);
        if dir == Vec3::ZERO || !(max_distance >= 0.0) {
            return None;
        }
        self.surfaces
            .iter()
            .filter(|s| s.layers().intersects(mask))
            .filter_map(|s| s.intersect(origin, dir))
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, normal)| RayHit {
                point: origin + dir * t,
                normal,
                distance: t,
            })
    }
}
