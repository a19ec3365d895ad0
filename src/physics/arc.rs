//! Arc-casting: bent ray sequences that follow curved surfaces.

use glam::{Quat, Vec3};

use super::{Layers, PhysicsQuery, RayHit};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, project_on_plane, vec_normalize};

/// Chord segments are lengthened slightly so adjacent chords overlap.
const CHORD_OVERLAP: f32 = 1.001;

/// Parameters for a single arc-cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCast {
    /// Total sweep of the arc in degrees.
    pub angle: f32,
    /// Distance of the arc from its centre.
    pub radius: f32,
    /// Number of straight chords approximating the arc.
    pub resolution: u32,
    /// Layers the chords collide with.
    pub mask: Layers,
}

/// Sweeps an arc of rays around `center`.
///
/// The arc lives in the plane spanned by the rotation's forward and up axes.
/// It starts pitched `angle / 2` above forward and sweeps downward around
/// the local right axis, so a level arc first probes ahead, then below, then
/// back underneath the centre. The first chord that hits anything wins.
///
/// Returns `None` when no chord hits, the radius is not positive, or the
/// resolution is zero.
#[must_use]
pub fn arc_cast(
    physics: &dyn PhysicsQuery,
    center: Vec3,
    rotation: Quat,
    cast: &ArcCast,
) -> Option<RayHit> {
    if cast.resolution == 0 || !(cast.radius > 0.0) || !cast.radius.is_finite() {
        return None;
    }
    let step = (cast.angle / cast.resolution as f32).to_radians();
    let mut rot = rotation * Quat::from_rotation_x(-(cast.angle * 0.5).to_radians());
    for _ in 0..cast.resolution {
        let a = center + rot * Vec3::Z * cast.radius;
        rot *= Quat::from_rotation_x(step);
        let b = center + rot * Vec3::Z * cast.radius;
        let chord = b - a;
        let length = chord.length();
        if length <= f32::EPSILON {
            continue;
        }
        if let Some(hit) = physics.raycast(a, chord, length * CHORD_OVERLAP, cast.mask) {
            return Some(hit);
        }
    }
    None
}

/// Successive arc-casts that walk across a surface.
///
/// Each hit becomes the centre of the next cast, re-oriented so local up
/// matches the hit normal and forward keeps the direction of travel. The
/// chain ends at the first miss.
pub struct ArcChain<'a> {
    physics: &'a dyn PhysicsQuery,
    cast: ArcCast,
    pose: Pose,
    remaining: usize,
}

impl<'a> ArcChain<'a> {
    /// Starts a chain at `start`, travelling along `heading` projected onto
    /// the start pose's tangent plane.
    #[must_use]
    pub fn new(
        physics: &'a dyn PhysicsQuery,
        start: Pose,
        heading: Vec3,
        cast: ArcCast,
        max_links: usize,
    ) -> Self {
        let up = start.up();
        let rotation = look_rotation(heading, up);
        Self {
            physics,
            cast,
            pose: Pose::new(start.position, rotation),
            remaining: max_links,
        }
    }

    /// Pose the next link will be cast from.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }
}

impl Iterator for ArcChain<'_> {
    type Item = Pose;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let Some(hit) = arc_cast(self.physics, self.pose.position, self.pose.rotation, &self.cast)
        else {
            self.remaining = 0;
            return None;
        };
        let travel = vec_normalize(hit.point - self.pose.position);
        let heading = if travel == Vec3::ZERO {
            self.pose.forward()
        } else {
            project_on_plane(travel, hit.normal)
        };
        self.pose = Pose::new(hit.point, look_rotation(heading, hit.normal));
        Some(self.pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{StaticSurfaces, Surface};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn floor() -> StaticSurfaces {
        StaticSurfaces::new(vec![Surface::plane(Vec3::ZERO, Vec3::Y, Layers::ENVIRONMENT)])
    }

    fn cast(radius: f32) -> ArcCast {
        ArcCast {
            angle: 270.0,
            radius,
            resolution: 12,
            mask: Layers::ENVIRONMENT,
        }
    }

    #[rstest]
    fn arc_on_floor_lands_ahead(floor: StaticSurfaces) {
        let hit = arc_cast(&floor, Vec3::ZERO, Quat::IDENTITY, &cast(0.5))
            .expect("arc should reach the floor");
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-5);
        assert!(hit.point.z > 0.4 && hit.point.z <= 0.5 + 1e-3, "{:?}", hit.point);
        assert_relative_eq!(hit.normal.y, 1.0);
    }

    #[rstest]
    fn arc_in_empty_space_misses() {
        let empty = StaticSurfaces::default();
        assert!(arc_cast(&empty, Vec3::ZERO, Quat::IDENTITY, &cast(1.0)).is_none());
    }

    #[rstest]
    #[case::zero_radius(0.0, 8)]
    #[case::zero_resolution(1.0, 0)]
    fn degenerate_arc_misses(floor: StaticSurfaces, #[case] radius: f32, #[case] resolution: u32) {
        let mut params = cast(radius);
        params.resolution = resolution;
        assert!(arc_cast(&floor, Vec3::ZERO, Quat::IDENTITY, &params).is_none());
    }

    #[rstest]
    fn arc_wraps_onto_wall() {
        let world = StaticSurfaces::new(vec![
            Surface::plane(Vec3::ZERO, Vec3::Y, Layers::ENVIRONMENT),
            Surface::plane(Vec3::new(0.0, 0.0, 0.2), Vec3::NEG_Z, Layers::ENVIRONMENT),
        ]);
        let hit = arc_cast(&world, Vec3::ZERO, Quat::IDENTITY, &cast(0.5))
            .expect("arc should meet the wall first");
        assert_relative_eq!(hit.normal.z, -1.0);
    }

    #[rstest]
    fn chain_walks_in_a_straight_line(floor: StaticSurfaces) {
        let points: Vec<Pose> =
            ArcChain::new(&floor, Pose::IDENTITY, Vec3::X, cast(0.25), 4).collect();
        assert_eq!(points.len(), 4);
        for pair in points.windows(2) {
            let [a, b] = pair else { continue };
            assert!(b.position.x > a.position.x);
            assert_relative_eq!(b.position.z, 0.0, epsilon = 1e-4);
        }
    }
}
