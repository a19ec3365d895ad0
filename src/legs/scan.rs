//! Radial surface scan producing candidate footholds.

use glam::{Quat, Vec3};

use crate::config::ScanConfig;
use crate::constants::{MAX_SCAN_ARMS, MAX_SCAN_RESOLUTION};
use crate::physics::{arc_cast, ArcCast, ArcChain, Layers, PhysicsQuery};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, project_on_plane};

/// Shortest first-link radius, as a fraction of the configured radius.
const MIN_RADIUS_FRACTION: f32 = 0.25;

/// Candidate foothold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footstep {
    /// Surface point, up axis along the surface normal.
    pub pose: Pose,
    /// Preference in `0..=1`; later samples along an arm weigh less when
    /// distance weighting is on.
    pub weight: f32,
}

/// Casts `config.arms` arms of arc-cast chains around `origin`.
///
/// Each arm starts along its own yaw about the origin's up axis. The first
/// link's radius grows on the side the body is moving toward, by the
/// horizontal velocity component along the arm times
/// `config.velocity_bias`. An arm whose first link misses contributes
/// nothing. The result is recomputed on every call.
#[must_use]
pub fn scan(
    physics: &dyn PhysicsQuery,
    origin: Pose,
    velocity: Vec3,
    config: &ScanConfig,
    mask: Layers,
) -> Vec<Footstep> {
    let up = origin.up();
    let horizontal = project_on_plane(velocity, up);
    let cast = ArcCast {
        angle: config.arc_angle,
        radius: config.radius,
        resolution: config.arc_resolution,
        mask,
    };
    let arms = config.arms.max(1);
    let capacity = (arms.min(MAX_SCAN_ARMS) as usize)
        .saturating_mul(config.resolution.min(MAX_SCAN_RESOLUTION));
    let mut out = Vec::with_capacity(capacity);

    for arm in 0..arms {
        let yaw = std::f32::consts::TAU * arm as f32 / arms as f32;
        let rotation = origin.rotation * Quat::from_rotation_y(yaw);
        let direction = rotation * Vec3::Z;
        let bias = horizontal.dot(direction) * config.velocity_bias;
        let first_radius = (config.radius + bias).max(config.radius * MIN_RADIUS_FRACTION);

        let first = ArcCast {
            radius: first_radius,
            ..cast
        };
        let Some(hit) = arc_cast(physics, origin.position, rotation, &first) else {
            continue;
        };
        let heading = project_on_plane(hit.point - origin.position, hit.normal);
        let start = Pose::new(hit.point, look_rotation(heading, hit.normal));

        let samples = std::iter::once(start).chain(ArcChain::new(
            physics,
            start,
            heading,
            cast,
            config.resolution.saturating_sub(1),
        ));
        for (index, pose) in samples.take(config.resolution).enumerate() {
            out.push(Footstep {
                pose,
                weight: sample_weight(index, config),
            });
        }
    }
    out
}

fn sample_weight(index: usize, config: &ScanConfig) -> f32 {
    if config.distance_weighting {
        1.0 - index as f32 / config.resolution.max(1) as f32
    } else {
        1.0
    }
}

/// Best candidate for a foot aiming at `anchor`: highest weight discounted
/// by distance.
#[must_use]
pub fn best_foothold(candidates: &[Footstep], anchor: Vec3) -> Option<Footstep> {
    let score = |f: &Footstep| f.weight / (1.0 + f.pose.position.distance(anchor));
    candidates
        .iter()
        .copied()
        .max_by(|a, b| score(a).total_cmp(&score(b)))
}
