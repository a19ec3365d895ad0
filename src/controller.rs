//! Surface-following locomotion.
//!
//! The controller keeps two velocity components. The base velocity is
//! integrated from a 2D movement input and decays by friction on every fixed
//! tick. The transient velocity carries knockback and dive launches and
//! decays on its own rate. On every frame the body is arc-cast along the
//! combined velocity and snapped onto whatever surface the arc meets, with
//! its up axis matched to that surface's normal.

use glam::{Quat, Vec2, Vec3};
use log::trace;

use crate::config::LocomotionConfig;
use crate::physics::{arc_cast, ArcCast, PhysicsQuery};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, project_on_plane, DIRECTION_EPSILON};

/// Probe rays start this far above the body so a body resting exactly on a
/// surface still registers it.
const PROBE_LIFT: f32 = 0.05;

/// Applies exponential-style friction, never overshooting past zero.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use skitter::controller::apply_friction;
/// let v = apply_friction(Vec3::new(2.0, 0.0, 0.0), 4.0, 0.1);
/// assert!((v.x - 1.2).abs() < 1e-6);
/// assert_eq!(apply_friction(Vec3::X, 100.0, 1.0), Vec3::ZERO);
/// ```
#[must_use]
pub fn apply_friction(velocity: Vec3, friction: f32, dt: f32) -> Vec3 {
    let k = (friction * dt).clamp(0.0, 1.0);
    velocity - velocity * k
}

/// Body locomotion for one monster.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiderController {
    pose: Pose,
    base_velocity: Vec3,
    transient_velocity: Vec3,
    config: LocomotionConfig,
}

impl SpiderController {
    /// Controller at rest at `pose`.
    #[must_use]
    pub const fn new(config: LocomotionConfig, pose: Pose) -> Self {
        Self {
            pose,
            base_velocity: Vec3::ZERO,
            transient_velocity: Vec3::ZERO,
            config,
        }
    }

    /// Body pose.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Teleports the body without touching its velocity.
    pub const fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Combined base and transient velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.base_velocity + self.transient_velocity
    }

    /// Steered velocity.
    #[must_use]
    pub const fn base_velocity(&self) -> Vec3 {
        self.base_velocity
    }

    /// Impulse velocity from knockback and dives.
    #[must_use]
    pub const fn transient_velocity(&self) -> Vec3 {
        self.transient_velocity
    }

    /// Speed as a fraction of `max_speed`, clamped to `0..=1`.
    #[must_use]
    pub fn speed_progress(&self) -> f32 {
        (self.velocity().length() / self.config.max_speed).clamp(0.0, 1.0)
    }

    /// Integrates a movement input into the base velocity.
    ///
    /// `input` is in body space (`x` right, `y` forward) and clamped to unit
    /// length. When `comfort_blocker` lies within `comfort_distance` of the
    /// body the base velocity is zeroed instead.
    pub fn apply_movement_direction(&mut self, input: Vec2, dt: f32, comfort_blocker: Option<Vec3>) {
        let comfort = self.config.comfort_distance;
        if comfort > 0.0
            && comfort_blocker.is_some_and(|p| p.distance(self.pose.position) <= comfort)
        {
            trace!("comfort stop at {:?}", self.pose.position);
            self.base_velocity = Vec3::ZERO;
            return;
        }
        let clamped = input.clamp_length_max(1.0);
        let accel = self.config.acceleration;
        let local = Vec3::new(clamped.x * accel.x, 0.0, clamped.y * accel.y);
        let world = self.pose.rotation * local;
        let tangent = project_on_plane(self.base_velocity + world * dt, self.pose.up());
        self.base_velocity = tangent.clamp_length_max(self.config.max_speed);
    }

    /// Adds transient (knockback, launch) velocity.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        self.transient_velocity += velocity;
    }

    /// Stops the body dead.
    pub const fn reset_velocity(&mut self) {
        self.base_velocity = Vec3::ZERO;
        self.transient_velocity = Vec3::ZERO;
    }

    /// Drops impulse velocity, keeping the steered part.
    pub const fn reset_transient(&mut self) {
        self.transient_velocity = Vec3::ZERO;
    }

    /// Friction decay for both velocity components.
    pub fn fixed_tick(&mut self, dt: f32) {
        self.base_velocity = apply_friction(self.base_velocity, self.config.friction, dt);
        self.transient_velocity =
            apply_friction(self.transient_velocity, self.config.transient_friction, dt);
    }

    /// Moves the body along its velocity for one frame.
    ///
    /// Returns `true` when the arc-cast found a surface and the pose was
    /// updated. A miss leaves the pose untouched for this frame.
    pub fn frame_tick(&mut self, physics: &dyn PhysicsQuery, dt: f32) -> bool {
        let velocity = self.velocity();
        let speed = velocity.length();
        if speed <= DIRECTION_EPSILON || dt <= 0.0 {
            return false;
        }
        let cast = ArcCast {
            angle: self.config.arc_angle,
            radius: speed * dt,
            resolution: self.config.arc_resolution,
            mask: self.config.surface_layers(),
        };
        let heading = look_rotation(velocity, self.pose.up());
        let Some(hit) = arc_cast(physics, self.pose.position, heading, &cast) else {
            trace!("locomotion arc missed at {:?}", self.pose.position);
            return false;
        };

        let tilt = Quat::from_rotation_arc(self.pose.up(), hit.normal);
        self.base_velocity = project_on_plane(tilt * self.base_velocity, hit.normal);
        self.transient_velocity = project_on_plane(tilt * self.transient_velocity, hit.normal);
        let facing = if self.base_velocity.length() > DIRECTION_EPSILON {
            self.base_velocity
        } else {
            tilt * self.pose.forward()
        };
        self.pose = Pose::new(hit.point, look_rotation(facing, hit.normal));
        true
    }

    /// Short downward ray along the body's local down axis.
    #[must_use]
    pub fn probe_ground(&self, physics: &dyn PhysicsQuery) -> bool {
        let up = self.pose.up();
        physics
            .raycast(
                self.pose.position + up * PROBE_LIFT,
                -up,
                self.config.ground_probe_distance + PROBE_LIFT,
                self.config.surface_layers(),
            )
            .is_some()
    }
}
