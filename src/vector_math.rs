//! Basic vector math helper functions.
//! Small helpers for orienting frames against arbitrary surface normals.
use glam::{Mat3, Quat, Vec3};

/// Lengths below this are treated as zero when normalising.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Returns the unit vector in the direction of `vector`.
///
/// Non-finite or zero-length input yields [`Vec3::ZERO`].
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use skitter::vec_normalize;
/// let n = vec_normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((n.x - 0.6).abs() < 1e-6);
/// assert!((n.z - 0.8).abs() < 1e-6);
/// assert_eq!(vec_normalize(Vec3::ZERO), Vec3::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec3) -> Vec3 {
    if !vector.is_finite() {
        return Vec3::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Removes the component of `vector` along `normal`.
///
/// `normal` is expected to be unit length.
#[must_use]
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

/// Builds a rotation whose local `+Z` points along `forward` and whose local
/// `+Y` is as close to `up` as the forward axis allows.
///
/// When `forward` is parallel to `up` (or zero) an arbitrary perpendicular
/// forward is chosen so the result is always a valid rotation.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use skitter::vector_math::look_rotation;
/// let rot = look_rotation(Vec3::X, Vec3::Y);
/// assert!((rot * Vec3::Z - Vec3::X).length() < 1e-5);
/// assert!((rot * Vec3::Y - Vec3::Y).length() < 1e-5);
/// ```
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let up_axis = up.try_normalize().unwrap_or(Vec3::Y);
    let mut fwd = vec_normalize(project_on_plane(forward, up_axis));
    if fwd == Vec3::ZERO {
        fwd = up_axis.any_orthonormal_vector();
    }
    let right = up_axis.cross(fwd).normalize();
    let true_up = fwd.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, fwd)).normalize()
}

/// Re-orients `rotation` so its local up axis matches `normal` while keeping
/// its forward axis as close to the previous heading as possible.
#[must_use]
pub fn align_to_normal(rotation: Quat, normal: Vec3) -> Quat {
    look_rotation(rotation * Vec3::Z, normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::level(Vec3::Z, Vec3::Y)]
    #[case::wall(Vec3::Y, Vec3::NEG_X)]
    #[case::ceiling(Vec3::X, Vec3::NEG_Y)]
    fn look_rotation_maps_axes(#[case] forward: Vec3, #[case] up: Vec3) {
        let rot = look_rotation(forward, up);
        assert_relative_eq!((rot * Vec3::Z).dot(forward), 1.0, epsilon = 1e-5);
        assert_relative_eq!((rot * Vec3::Y).dot(up), 1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn look_rotation_survives_parallel_axes() {
        let rot = look_rotation(Vec3::Y, Vec3::Y);
        assert!(rot.is_finite());
        assert_relative_eq!((rot * Vec3::Y).dot(Vec3::Y), 1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn align_to_normal_keeps_heading() {
        let rot = look_rotation(Vec3::X, Vec3::Y);
        let tilted = align_to_normal(rot, Vec3::new(0.0, 1.0, 1.0).normalize());
        let fwd = tilted * Vec3::Z;
        assert_relative_eq!(fwd.dot(Vec3::X), 1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn project_on_plane_drops_normal_component() {
        let v = project_on_plane(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        assert_relative_eq!(v.y, 0.0);
        assert_relative_eq!(v.x, 1.0);
    }

    #[rstest]
    fn normalise_rejects_nan() {
        assert_eq!(vec_normalize(Vec3::new(f32::NAN, 0.0, 1.0)), Vec3::ZERO);
    }
}
