//! Orbit anchor solvers.
//!
//! Both solvers are local searches over arc-cast chains and may settle in a
//! local minimum. A `None` result means "leave the orbit where it is".

use glam::Vec3;

use crate::physics::{ArcCast, ArcChain, PhysicsQuery};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, project_on_plane, vec_normalize};

/// Inputs shared by both solvers for a single leg.
#[derive(Debug, Clone, Copy)]
pub struct OrbitProblem {
    /// Body pose the orbit hangs from.
    pub parent: Pose,
    /// Current orbit anchor.
    pub orbit: Pose,
    /// World position of the foot target.
    pub foot: Vec3,
    /// Direction from the parent toward the leg's rest orbit.
    pub heading: Vec3,
    /// Rest distance between orbit and foot.
    pub rest_to_foot: f32,
    /// Rest distance between orbit and body.
    pub rest_to_parent: f32,
}

/// Walks outward from the parent until the distance to the foot crosses
/// the rest distance, then interpolates between the straddling samples.
///
/// Gives up after `cap` links or when the chain leaves the surface.
#[must_use]
pub fn solve_leg_distance(
    physics: &dyn PhysicsQuery,
    problem: &OrbitProblem,
    cast: ArcCast,
    cap: usize,
) -> Option<Pose> {
    let error = |p: &Pose| p.position.distance(problem.foot) - problem.rest_to_foot;
    let mut previous = problem.parent;
    let mut previous_error = error(&previous);
    if previous_error == 0.0 {
        return Some(orient(previous, &problem.parent));
    }

    for current in ArcChain::new(physics, problem.parent, problem.heading, cast, cap) {
        let current_error = error(&current);
        if current_error == 0.0 || previous_error.signum() != current_error.signum() {
            let t = previous_error / (previous_error - current_error);
            let crossing = previous.lerp(&current, t.clamp(0.0, 1.0));
            return Some(orient(crossing, &problem.parent));
        }
        previous = current;
        previous_error = current_error;
    }
    None
}

/// Squared error of a candidate orbit against both rest distances.
#[must_use]
pub fn orbit_score(position: Vec3, problem: &OrbitProblem) -> f32 {
    let foot = position.distance(problem.foot) - problem.rest_to_foot;
    let parent = position.distance(problem.parent.position) - problem.rest_to_parent;
    foot * foot + parent * parent
}

/// Hill-climbs from the current orbit, accepting only single arc-cast moves
/// that strictly lower [`orbit_score`].
///
/// Returns `None` when no move improved the score.
#[must_use]
pub fn solve_score(
    physics: &dyn PhysicsQuery,
    problem: &OrbitProblem,
    cast: ArcCast,
    cap: usize,
) -> Option<Pose> {
    let mut best = problem.orbit;
    let mut best_score = orbit_score(best.position, problem);
    let mut moved = false;

    for _ in 0..cap {
        let up = best.up();
        let outward = vec_normalize(project_on_plane(problem.heading, up));
        let lateral = up.cross(outward);
        let step = [outward, -outward, lateral, -lateral]
            .into_iter()
            .filter(|d| *d != Vec3::ZERO)
            .filter_map(|d| ArcChain::new(physics, best, d, cast, 1).next())
            .map(|p| (orbit_score(p.position, problem), p))
            .filter(|(s, _)| *s < best_score)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let Some((score, pose)) = step else {
            break;
        };
        best = pose;
        best_score = score;
        moved = true;
    }
    moved.then(|| orient(best, &problem.parent))
}

/// Keeps the surface normal from the chain but faces the parent's heading.
fn orient(pose: Pose, parent: &Pose) -> Pose {
    Pose::new(pose.position, look_rotation(parent.forward(), pose.up()))
}
