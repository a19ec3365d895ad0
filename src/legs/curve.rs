//! Foot lift profile applied over the course of a step.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Height multiplier as a function of step progress `t ∈ [0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightCurve {
    /// `sin(πt)`.
    #[default]
    Sine,
    /// `4t(1 - t)`.
    Parabola,
    /// Piecewise-linear through `[t, height]` points sorted by `t`.
    Keyframes {
        /// `[t, height]` control points.
        points: Vec<[f32; 2]>,
    },
}

impl HeightCurve {
    /// Samples the curve, clamping `t` into `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, progress: f32) -> f32 {
        let t = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        match self {
            Self::Sine => (t * std::f32::consts::PI).sin(),
            Self::Parabola => 4.0 * t * (1.0 - t),
            Self::Keyframes { points } => sample_keyframes(points, t),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let Self::Keyframes { points } = self else {
            return Ok(());
        };
        if points.is_empty() {
            return Err(ConfigError::invalid(
                "legs.step.curve",
                "keyframe curve needs at least one point",
            ));
        }
        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("legs.step.curve", "keyframes must be finite"));
        }
        if points.windows(2).any(|w| matches!(w, [a, b] if b[0] < a[0])) {
            return Err(ConfigError::invalid(
                "legs.step.curve",
                "keyframe times must be ascending",
            ));
        }
        Ok(())
    }
}

fn sample_keyframes(points: &[[f32; 2]], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if t <= first[0] {
        return first[1];
    }
    if t >= last[0] {
        return last[1];
    }
    points
        .windows(2)
        .find_map(|w| match w {
            [a, b] if t >= a[0] && t <= b[0] => {
                let span = b[0] - a[0];
                let u = if span > 0.0 { (t - a[0]) / span } else { 1.0 };
                Some(a[1] + (b[1] - a[1]) * u)
            }
            _ => None,
        })
        .unwrap_or(last[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::sine_mid(HeightCurve::Sine, 0.5, 1.0)]
    #[case::sine_end(HeightCurve::Sine, 1.0, 0.0)]
    #[case::parabola_mid(HeightCurve::Parabola, 0.5, 1.0)]
    #[case::parabola_quarter(HeightCurve::Parabola, 0.25, 0.75)]
    #[case::clamped(HeightCurve::Parabola, 3.0, 0.0)]
    fn analytic_curves(#[case] curve: HeightCurve, #[case] t: f32, #[case] expected: f32) {
        assert_relative_eq!(curve.evaluate(t), expected, epsilon = 1e-5);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.25, 0.5)]
    #[case(0.5, 1.0)]
    #[case(0.75, 0.5)]
    fn keyframes_interpolate(#[case] t: f32, #[case] expected: f32) {
        let curve = HeightCurve::Keyframes {
            points: vec![[0.0, 0.0], [0.5, 1.0], [1.0, 0.0]],
        };
        assert_relative_eq!(curve.evaluate(t), expected, epsilon = 1e-5);
    }

    #[rstest]
    fn unsorted_keyframes_are_rejected() {
        let curve = HeightCurve::Keyframes {
            points: vec![[0.5, 1.0], [0.1, 0.0]],
        };
        assert!(curve.validate().is_err());
    }

    #[rstest]
    fn curve_deserialises_from_tagged_json() {
        let curve: HeightCurve =
            serde_json::from_str(r#"{ "kind": "keyframes", "points": [[0.0, 0.0], [1.0, 1.0]] }"#)
                .expect("valid curve");
        assert_relative_eq!(curve.evaluate(0.5), 0.5);
    }
}
