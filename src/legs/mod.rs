//! Procedural leg rig.
//!
//! Each leg owns a foot target and an orbit anchor. Orbits are re-solved on
//! the fixed tick; steps are scheduled and animated on the frame tick. A leg
//! that is already stepping ignores further step requests until it lands.

mod curve;
mod orbit;
mod scan;
mod step;

use glam::Vec3;
use log::trace;
use rand::Rng;

pub use curve::HeightCurve;
pub use orbit::{orbit_score, solve_leg_distance, solve_score, OrbitProblem};
pub use scan::{best_foothold, scan, Footstep};
pub use step::{ActiveStep, LegGroup, StepPhase, StepScheduler};

use crate::collaborators::{StepAudio, StepCue};
use crate::config::{LegLayout, LegRigConfig, OrbitMode};
use crate::physics::{ArcCast, ArcChain, Layers, PhysicsQuery};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, project_on_plane, vec_normalize};

/// Speeds below this do not trigger steps.
const MIN_STEP_SPEED: f32 = 1e-3;

/// A single leg of the rig.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    layout: LegLayout,
    foot: Pose,
    orbit: Pose,
    rest_to_orbit: f32,
    rest_to_parent: f32,
    delay: Option<f32>,
    step: Option<ActiveStep>,
}

impl Leg {
    fn at_rest(layout: LegLayout, body: &Pose) -> Self {
        let foot = Pose::new(body.transform_point(layout.foot), body.rotation);
        let orbit = Pose::new(body.transform_point(layout.orbit), body.rotation);
        Self {
            layout,
            rest_to_orbit: foot.position.distance(orbit.position),
            rest_to_parent: orbit.position.distance(body.position),
            foot,
            orbit,
            delay: None,
            step: None,
        }
    }

    /// Where the foot currently rests (or is passing through mid-step).
    #[must_use]
    pub const fn foot(&self) -> Pose {
        self.foot
    }

    /// Surface anchor the foot is solved around.
    #[must_use]
    pub const fn orbit(&self) -> Pose {
        self.orbit
    }

    /// Foot-to-orbit distance captured at construction.
    #[must_use]
    pub const fn rest_to_orbit(&self) -> f32 {
        self.rest_to_orbit
    }

    /// Orbit-to-body distance captured at construction.
    #[must_use]
    pub const fn rest_to_parent(&self) -> f32 {
        self.rest_to_parent
    }

    /// True from the moment a step is accepted until the foot lands.
    #[must_use]
    pub const fn is_stepping(&self) -> bool {
        self.delay.is_some() || self.step.is_some()
    }

    fn heading(&self, body: &Pose) -> Vec3 {
        let rest = body.rotation * self.layout.orbit;
        let planar = vec_normalize(project_on_plane(rest, body.up()));
        if planar == Vec3::ZERO {
            body.forward()
        } else {
            planar
        }
    }
}

/// Per-frame inputs to [`LegRig::frame_tick`].
pub struct StepDrive<'a, R: Rng> {
    /// Collision world.
    pub physics: &'a dyn PhysicsQuery,
    /// Body pose this frame.
    pub body: Pose,
    /// Body velocity this frame.
    pub velocity: Vec3,
    /// Speed as a fraction of the configured maximum, in `0..=1`.
    pub speed_progress: f32,
    /// Source for step jitter and pitch.
    pub rng: &'a mut R,
    /// Footstep sink; `None` mutes the rig.
    pub audio: Option<&'a mut dyn StepAudio>,
}

/// All legs of one monster plus their step scheduler.
#[derive(Debug, Clone)]
pub struct LegRig {
    config: LegRigConfig,
    mask: Layers,
    legs: Vec<Leg>,
    groups: Vec<LegGroup>,
    scheduler: StepScheduler,
}

impl LegRig {
    /// Places every leg at its rest layout relative to `body`.
    #[must_use]
    pub fn new(config: LegRigConfig, body: Pose, mask: Layers) -> Self {
        let legs = config.legs.iter().map(|l| Leg::at_rest(*l, &body)).collect();
        let groups = (0..config.legs.len())
            .map(|i| {
                if config.group_a.contains(&i) {
                    LegGroup::A
                } else {
                    LegGroup::B
                }
            })
            .collect();
        Self {
            config,
            mask,
            legs,
            groups,
            scheduler: StepScheduler::default(),
        }
    }

    /// Every leg in layout order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Group of the leg at `index`.
    #[must_use]
    pub fn group_of(&self, index: usize) -> Option<LegGroup> {
        self.groups.get(index).copied()
    }

    /// Puts feet and orbits back at rest and cancels in-flight steps.
    /// Rest distances keep their original values.
    pub fn reset(&mut self, body: Pose) {
        for leg in &mut self.legs {
            leg.foot = Pose::new(body.transform_point(leg.layout.foot), body.rotation);
            leg.orbit = Pose::new(body.transform_point(leg.layout.orbit), body.rotation);
            leg.delay = None;
            leg.step = None;
        }
        self.scheduler = StepScheduler::default();
    }

    /// Queues a step for one leg after `delay` seconds.
    ///
    /// Returns `false` (and changes nothing) when the leg is already stepping
    /// or the index is out of range.
    pub fn request_step(&mut self, index: usize, delay: f32) -> bool {
        let Some(leg) = self.legs.get_mut(index) else {
            return false;
        };
        if leg.is_stepping() {
            trace!("leg {index} busy; step request ignored");
            return false;
        }
        leg.delay = Some(delay.max(0.0));
        true
    }

    /// Re-solves every orbit anchor against the current body pose.
    pub fn fixed_tick(&mut self, physics: &dyn PhysicsQuery, body: Pose) {
        let orbit_cfg = &self.config.orbit;
        let cast = ArcCast {
            angle: orbit_cfg.arc_angle,
            radius: orbit_cfg.arc_radius,
            resolution: orbit_cfg.arc_resolution,
            mask: self.mask,
        };
        for leg in &mut self.legs {
            let problem = OrbitProblem {
                parent: body,
                orbit: leg.orbit,
                foot: leg.foot.position,
                heading: leg.heading(&body),
                rest_to_foot: leg.rest_to_orbit,
                rest_to_parent: leg.rest_to_parent,
            };
            let solved = match orbit_cfg.mode {
                OrbitMode::LegDistance => {
                    solve_leg_distance(physics, &problem, cast, orbit_cfg.iteration_cap)
                }
                OrbitMode::Score => solve_score(physics, &problem, cast, orbit_cfg.iteration_cap),
            };
            if let Some(orbit) = solved {
                leg.orbit = orbit;
            }
        }
    }

    /// Runs the scheduler and advances every pending or active step.
    pub fn frame_tick<R: Rng>(&mut self, drive: &mut StepDrive<'_, R>, dt: f32) {
        let step_cfg = &self.config.step;
        let due = self.scheduler.advance(dt, step_cfg.period, step_cfg.desync);
        let moving = drive.velocity.length() > MIN_STEP_SPEED;
        if let (Some(group), true) = (due, moving) {
            let jitter = step_cfg.jitter;
            for index in 0..self.legs.len() {
                if self.groups.get(index) == Some(&group) {
                    let delay = if jitter > 0.0 {
                        drive.rng.gen_range(0.0..jitter)
                    } else {
                        0.0
                    };
                    self.request_step(index, delay);
                }
            }
        }

        for index in 0..self.legs.len() {
            self.advance_leg(index, drive, dt);
        }
    }

    fn advance_leg<R: Rng>(&mut self, index: usize, drive: &mut StepDrive<'_, R>, dt: f32) {
        let mut remaining = dt;
        if let Some(delay) = self.legs.get(index).and_then(|l| l.delay) {
            if delay > dt {
                if let Some(leg) = self.legs.get_mut(index) {
                    leg.delay = Some(delay - dt);
                }
                return;
            }
            remaining = dt - delay;
            self.begin_step(index, drive);
        }

        let cfg = &self.config.step;
        let audible = drive.speed_progress >= cfg.audio_min_progress;
        let Some(leg) = self.legs.get_mut(index) else {
            return;
        };
        let Some(step) = leg.step.as_mut() else {
            return;
        };
        let (pose, phase) =
            step.advance(remaining, cfg.duration, cfg.height, &cfg.curve, drive.speed_progress);
        leg.foot = pose;
        let cue = match phase {
            StepPhase::Lifting => None,
            StepPhase::Midway => Some(StepCue::Move),
            StepPhase::Landed => {
                leg.step = None;
                Some(StepCue::End)
            }
        };
        if let (Some(cue), true) = (cue, audible) {
            play(drive, cfg.pitch_jitter, cue, index, pose.position);
        }
    }

    fn begin_step<R: Rng>(&mut self, index: usize, drive: &mut StepDrive<'_, R>) {
        let landing = self
            .legs
            .get(index)
            .and_then(|leg| self.step_target(leg, drive));
        let cfg = &self.config.step;
        let audible = drive.speed_progress >= cfg.audio_min_progress;
        let Some(leg) = self.legs.get_mut(index) else {
            return;
        };
        leg.delay = None;
        let Some(end) = landing else {
            trace!("leg {index} found no foothold; step skipped");
            return;
        };
        leg.step = Some(ActiveStep::new(leg.foot, end));
        if audible {
            play(drive, cfg.pitch_jitter, StepCue::Start, index, leg.foot.position);
        }
    }

    /// Landing pose: the orbit pushed along the velocity for half a period's
    /// travel, snapped to the surface. Falls back to the best scanned
    /// foothold near the orbit when the surface runs out.
    fn step_target<R: Rng>(&self, leg: &Leg, drive: &StepDrive<'_, R>) -> Option<Pose> {
        let cfg = &self.config.step;
        let speed = drive.velocity.length();
        let travel = 0.5 * cfg.period * speed;
        let links = (travel / cfg.segment).ceil().max(1.0) as usize;
        let cast = ArcCast {
            angle: self.config.orbit.arc_angle,
            radius: travel / links as f32,
            resolution: self.config.orbit.arc_resolution,
            mask: self.mask,
        };
        let heading = drive.velocity;
        let mut reached = 0;
        let mut last = leg.orbit;
        for pose in ArcChain::new(drive.physics, leg.orbit, heading, cast, links) {
            last = pose;
            reached += 1;
        }
        if reached == links {
            let facing = look_rotation(drive.body.forward(), last.up());
            return Some(Pose::new(last.position, facing));
        }
        let candidates = scan(
            drive.physics,
            leg.orbit,
            drive.velocity,
            &self.config.scan,
            self.mask,
        );
        best_foothold(&candidates, leg.orbit.position + heading * cfg.period * 0.5)
            .map(|f| f.pose)
    }
}

fn play<R: Rng>(drive: &mut StepDrive<'_, R>, jitter: f32, cue: StepCue, leg: usize, at: Vec3) {
    let pitch = if jitter > 0.0 {
        1.0 + drive.rng.gen_range(-jitter..jitter)
    } else {
        1.0
    };
    if let Some(audio) = drive.audio.as_deref_mut() {
        audio.play(cue, leg, at, pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{StaticSurfaces, Surface};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn floor() -> StaticSurfaces {
        StaticSurfaces::new(vec![Surface::plane(Vec3::ZERO, Vec3::Y, Layers::ENVIRONMENT)])
    }

    #[derive(Default)]
    struct Cues(Vec<(StepCue, usize)>);

    impl StepAudio for Cues {
        fn play(&mut self, cue: StepCue, leg: usize, _position: Vec3, _pitch: f32) {
            self.0.push((cue, leg));
        }
    }

    fn rig() -> LegRig {
        let mut config = LegRigConfig::default();
        config.step.jitter = 0.0;
        LegRig::new(config, Pose::IDENTITY, Layers::ENVIRONMENT)
    }

    #[rstest]
    fn rest_distances_match_layout() {
        let rig = rig();
        for (leg, layout) in rig.legs().iter().zip(&LegRigConfig::default().legs) {
            assert_relative_eq!(leg.rest_to_orbit(), layout.foot.distance(layout.orbit));
            assert_relative_eq!(leg.rest_to_parent(), layout.orbit.length());
        }
    }

    #[rstest]
    fn groups_follow_configured_subset() {
        let rig = rig();
        assert_eq!(rig.group_of(0), Some(LegGroup::A));
        assert_eq!(rig.group_of(1), Some(LegGroup::B));
        assert_eq!(rig.group_of(99), None);
    }

    #[rstest]
    fn busy_leg_ignores_new_requests() {
        let mut rig = rig();
        assert!(rig.request_step(0, 0.2));
        assert!(!rig.request_step(0, 0.0));
        assert!(!rig.request_step(42, 0.0));
    }

    #[rstest]
    fn moving_rig_steps_group_a_first(floor: StaticSurfaces) {
        let mut rig = rig();
        let mut rng = StdRng::seed_from_u64(7);
        let mut cues = Cues::default();
        let mut drive = StepDrive {
            physics: &floor,
            body: Pose::IDENTITY,
            velocity: Vec3::Z * 0.5,
            speed_progress: 0.5,
            rng: &mut rng,
            audio: Some(&mut cues),
        };
        rig.frame_tick(&mut drive, 0.01);
        let stepping: Vec<bool> = rig.legs().iter().map(Leg::is_stepping).collect();
        assert_eq!(stepping, vec![true, false, false, true, true, false, false, true]);
        assert!(cues.0.iter().all(|(cue, _)| *cue == StepCue::Start));
    }

    #[rstest]
    fn stepped_foot_lands_ahead_of_orbit(floor: StaticSurfaces) {
        let mut rig = rig();
        let orbit_before = rig.legs()[0].orbit().position;
        let mut rng = StdRng::seed_from_u64(1);
        let mut drive = StepDrive {
            physics: &floor,
            body: Pose::IDENTITY,
            velocity: Vec3::Z,
            speed_progress: 1.0,
            rng: &mut rng,
            audio: None,
        };
        // Long enough to land, short enough that group A has not lifted again.
        for _ in 0..30 {
            rig.frame_tick(&mut drive, 0.01);
        }
        let foot = rig.legs()[0].foot().position;
        assert!(foot.z > orbit_before.z, "foot {foot:?} orbit {orbit_before:?}");
        assert_relative_eq!(foot.y, 0.0, epsilon = 1e-3);
    }

    #[rstest]
    fn still_rig_never_steps(floor: StaticSurfaces) {
        let mut rig = rig();
        let before: Vec<Pose> = rig.legs().iter().map(Leg::foot).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let mut drive = StepDrive {
            physics: &floor,
            body: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            speed_progress: 0.0,
            rng: &mut rng,
            audio: None,
        };
        for _ in 0..100 {
            rig.frame_tick(&mut drive, 0.02);
        }
        let after: Vec<Pose> = rig.legs().iter().map(Leg::foot).collect();
        assert_eq!(before, after);
    }

    #[rstest]
    fn orbits_hold_rest_distance_on_flat_floor(floor: StaticSurfaces) {
        let mut rig = rig();
        rig.fixed_tick(&floor, Pose::from_position(Vec3::new(0.0, 0.0, 0.05)));
        for leg in rig.legs() {
            assert_relative_eq!(
                leg.orbit().position.distance(leg.foot().position),
                leg.rest_to_orbit(),
                epsilon = 1e-2
            );
        }
    }

    #[rstest]
    fn reset_cancels_steps() {
        let mut rig = rig();
        rig.request_step(2, 0.5);
        rig.reset(Pose::IDENTITY);
        assert!(rig.legs().iter().all(|l| !l.is_stepping()));
    }
}
