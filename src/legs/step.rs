//! Step timing: the alternating group scheduler and per-leg step motion.

use glam::Vec3;

use super::curve::HeightCurve;
use crate::pose::Pose;

/// One of the two leg groups that alternate stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegGroup {
    /// Steps first.
    A,
    /// Steps half a period later.
    B,
}

impl LegGroup {
    /// The opposite group.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Alternates leg groups every half period.
#[derive(Debug, Clone, PartialEq)]
pub struct StepScheduler {
    remaining: f32,
    next: LegGroup,
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self {
            remaining: 0.0,
            next: LegGroup::A,
        }
    }
}

impl StepScheduler {
    /// Advances the clock and returns the group due to step, if any.
    ///
    /// The first call fires group A immediately; afterwards the groups flip
    /// every `period * 0.5 * desync` seconds. At most one group fires per
    /// call, so very long frames do not burst.
    pub fn advance(&mut self, dt: f32, period: f32, desync: f32) -> Option<LegGroup> {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return None;
        }
        let due = self.next;
        self.next = due.other();
        let wait = (period * 0.5 * desync).max(f32::EPSILON);
        self.remaining = (self.remaining + wait).max(wait * 0.5);
        Some(due)
    }

    /// Group that fires next.
    #[must_use]
    pub const fn next_group(&self) -> LegGroup {
        self.next
    }
}

/// Point of a step's progress that [`ActiveStep::advance`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// First half of the step.
    Lifting,
    /// Progress just passed the midpoint.
    Midway,
    /// The foot reached its target.
    Landed,
}

/// An in-flight step for one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStep {
    start: Pose,
    end: Pose,
    elapsed: f32,
    midway_reported: bool,
}

impl ActiveStep {
    /// Step from `start` to `end`, not yet begun.
    #[must_use]
    pub const fn new(start: Pose, end: Pose) -> Self {
        Self {
            start,
            end,
            elapsed: 0.0,
            midway_reported: false,
        }
    }

    /// Landing pose.
    #[must_use]
    pub const fn end(&self) -> Pose {
        self.end
    }

    /// Advances by `dt` and returns the foot pose and the phase reached.
    ///
    /// The foot moves from start to end with `curve * height * speed_progress`
    /// added along the end pose's up axis.
    pub fn advance(
        &mut self,
        dt: f32,
        duration: f32,
        height: f32,
        curve: &HeightCurve,
        speed_progress: f32,
    ) -> (Pose, StepPhase) {
        self.elapsed += dt;
        let t = if duration > 0.0 {
            (self.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        if t >= 1.0 {
            return (self.end, StepPhase::Landed);
        }
        let mut pose = self.start.lerp(&self.end, t);
        let lift: Vec3 = self.end.up() * curve.evaluate(t) * height * speed_progress;
        pose.position += lift;
        let phase = if t >= 0.5 && !self.midway_reported {
            self.midway_reported = true;
            StepPhase::Midway
        } else {
            StepPhase::Lifting
        };
        (pose, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn scheduler_alternates_every_half_period() {
        let mut scheduler = StepScheduler::default();
        assert_eq!(scheduler.advance(0.01, 1.0, 1.0), Some(LegGroup::A));
        assert_eq!(scheduler.advance(0.3, 1.0, 1.0), None);
        assert_eq!(scheduler.advance(0.25, 1.0, 1.0), Some(LegGroup::B));
        assert_eq!(scheduler.advance(0.5, 1.0, 1.0), Some(LegGroup::A));
    }

    #[rstest]
    fn desync_stretches_the_wait() {
        let mut scheduler = StepScheduler::default();
        scheduler.advance(0.0, 1.0, 2.0);
        assert_eq!(scheduler.advance(0.9, 1.0, 2.0), None);
        assert_eq!(scheduler.advance(0.2, 1.0, 2.0), Some(LegGroup::B));
    }

    #[rstest]
    fn long_frames_fire_one_group_at_a_time() {
        let mut scheduler = StepScheduler::default();
        scheduler.advance(0.0, 1.0, 1.0);
        assert_eq!(scheduler.advance(10.0, 1.0, 1.0), Some(LegGroup::B));
        assert_eq!(scheduler.advance(0.0, 1.0, 1.0), None);
    }

    #[rstest]
    fn step_arcs_then_lands() {
        let start = Pose::from_position(Vec3::ZERO);
        let end = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        let mut step = ActiveStep::new(start, end);
        let (mid, phase) = step.advance(0.5, 1.0, 0.2, &HeightCurve::Sine, 1.0);
        assert_eq!(phase, StepPhase::Midway);
        assert_relative_eq!(mid.position.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(mid.position.y, 0.2, epsilon = 1e-5);
        let (late, phase) = step.advance(0.25, 1.0, 0.2, &HeightCurve::Sine, 1.0);
        assert_eq!(phase, StepPhase::Lifting);
        assert!(late.position.y > 0.0);
        let (landed, phase) = step.advance(0.5, 1.0, 0.2, &HeightCurve::Sine, 1.0);
        assert_eq!(phase, StepPhase::Landed);
        assert_eq!(landed, end);
    }

    #[rstest]
    fn standing_speed_keeps_foot_low() {
        let mut step = ActiveStep::new(
            Pose::IDENTITY,
            Pose::from_position(Vec3::new(0.0, 0.0, 1.0)),
        );
        let (pose, _) = step.advance(0.5, 1.0, 0.2, &HeightCurve::Sine, 0.0);
        assert_relative_eq!(pose.position.y, 0.0);
    }
}
