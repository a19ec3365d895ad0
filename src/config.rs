//! Serde-backed monster tuning.
//!
//! Every section defaults to the values in [`crate::constants`], so a JSON
//! file only needs to name what it changes. Loading always validates.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::legs::HeightCurve;
use crate::physics::Layers;

/// Complete tuning for one monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Seed for every random draw the monster makes.
    pub seed: u64,
    /// Starting and maximum hit points.
    pub max_health: f32,
    /// Targeting, attack and self-destruct tuning.
    pub combat: CombatConfig,
    /// Durations and thresholds for the behaviour states.
    pub timing: TimingConfig,
    /// Body movement tuning.
    pub locomotion: LocomotionConfig,
    /// Leg layout and gait.
    pub legs: LegRigConfig,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_health: DEFAULT_MAX_HEALTH,
            combat: CombatConfig::default(),
            timing: TimingConfig::default(),
            locomotion: LocomotionConfig::default(),
            legs: LegRigConfig::default(),
        }
    }
}

/// Targeting, attack and self-destruct tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Health fraction at or below which the monster goes kamikaze.
    pub kamikaze_threshold: f32,
    /// Targets further than this are ignored.
    pub chase_range: f32,
    /// Distance at which a chase turns into a charge.
    pub attack_range: f32,
    /// Damage dealt by a landed attack.
    pub attack_damage: f32,
    /// Pause between attacks.
    pub attack_cooldown: f32,
    /// Delay from the start of an attack to the hit test.
    pub attack_hit_delay: f32,
    /// Length of the attack state.
    pub attack_duration: f32,
    /// Wind-up before the attack fires.
    pub charge_delay: f32,
    /// Reach of the kamikaze blast.
    pub explosion_radius: f32,
    /// Damage dealt to every target inside the blast.
    pub explosion_damage: f32,
    /// Time from entering Kamikaze to detonation.
    pub kamikaze_fuse: f32,
    /// Length of the kamikaze animation.
    pub kamikaze_duration: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            kamikaze_threshold: KAMIKAZE_THRESHOLD,
            chase_range: CHASE_RANGE,
            attack_range: ATTACK_RANGE,
            attack_damage: ATTACK_DAMAGE,
            attack_cooldown: ATTACK_COOLDOWN,
            attack_hit_delay: ATTACK_HIT_DELAY,
            attack_duration: ATTACK_DURATION,
            charge_delay: CHARGE_DELAY,
            explosion_radius: EXPLOSION_RADIUS,
            explosion_damage: EXPLOSION_DAMAGE,
            kamikaze_fuse: KAMIKAZE_FUSE,
            kamikaze_duration: KAMIKAZE_DURATION,
        }
    }
}

/// Durations and thresholds for the behaviour states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Length of the stagger after taking damage.
    pub hurt_duration: f32,
    /// Idle time before a random dive.
    pub idle_time_before_dive: f32,
    /// Speed of a dive.
    pub dive_speed: f32,
    /// Longest a dive lasts.
    pub dive_duration: f32,
    /// A dive stops when a surface is this close ahead.
    pub dive_obstruction_distance: f32,
    /// Longest a hold lasts before the monster breaks free.
    pub max_hold_time: f32,
    /// Largest shake offset on each axis near the end of a hold.
    pub hold_shake_amplitude: f32,
    /// Delay after death before the body shrinks.
    pub death_scale_delay: f32,
    /// Time taken to shrink to nothing.
    pub scale_down_duration: f32,
    /// A chase slower than `stuck_speed` for this long gives up.
    pub stuck_timeout: f32,
    /// Speed below which a chasing monster counts as stuck.
    pub stuck_speed: f32,
    /// Lets an idle monster stroll to random points.
    pub wander_enabled: bool,
    /// Idle time before wandering.
    pub wander_delay: f32,
    /// Furthest a wander destination lies from the body.
    pub wander_radius: f32,
    /// Longest a single wander lasts.
    pub wander_timeout: f32,
    /// A destination this close counts as reached.
    pub arrive_distance: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hurt_duration: HURT_DURATION,
            idle_time_before_dive: IDLE_TIME_BEFORE_DIVE,
            dive_speed: DIVE_SPEED,
            dive_duration: DIVE_DURATION,
            dive_obstruction_distance: DIVE_OBSTRUCTION_DISTANCE,
            max_hold_time: MAX_HOLD_TIME,
            hold_shake_amplitude: HOLD_SHAKE_AMPLITUDE,
            death_scale_delay: DEATH_SCALE_DELAY,
            scale_down_duration: SCALE_DOWN_DURATION,
            stuck_timeout: STUCK_TIMEOUT,
            stuck_speed: STUCK_SPEED,
            wander_enabled: false,
            wander_delay: WANDER_DELAY,
            wander_radius: WANDER_RADIUS,
            wander_timeout: WANDER_TIMEOUT,
            arrive_distance: ARRIVE_DISTANCE,
        }
    }
}

/// Surface-following body movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Per-axis acceleration for the 2D movement input (x = right, y = forward).
    pub acceleration: Vec2,
    /// Decay rate for steered velocity.
    pub friction: f32,
    /// Decay rate for knockback and dive velocity.
    pub transient_friction: f32,
    /// Speed at which step height and audio reach full strength.
    pub max_speed: f32,
    /// Sweep of the arc cast, in degrees.
    pub arc_angle: f32,
    /// Segments in the arc cast.
    pub arc_resolution: u32,
    /// Reach of the downward ground check.
    pub ground_probe_distance: f32,
    /// Zero disables the comfort stop.
    pub comfort_distance: f32,
    /// Bits of [`Layers`] the monster walks on.
    pub surface_mask: u32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            acceleration: Vec2::new(ACCELERATION_X, ACCELERATION_Z),
            friction: FRICTION,
            transient_friction: TRANSIENT_FRICTION,
            max_speed: MAX_SPEED,
            arc_angle: MOVE_ARC_ANGLE,
            arc_resolution: MOVE_ARC_RESOLUTION,
            ground_probe_distance: GROUND_PROBE_DISTANCE,
            comfort_distance: COMFORT_DISTANCE,
            surface_mask: Layers::ENVIRONMENT.bits(),
        }
    }
}

impl LocomotionConfig {
    /// Walkable layers; unknown bits are dropped.
    #[must_use]
    pub const fn surface_layers(&self) -> Layers {
        Layers::from_bits_truncate(self.surface_mask)
    }
}

/// Rest layout of one leg in body-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegLayout {
    /// Resting foot position.
    pub foot: Vec3,
    /// Resting orbit anchor, the point the foot is solved around.
    pub orbit: Vec3,
}

/// How orbit anchors are re-solved each fixed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrbitMode {
    /// Walk out until the anchor sits at its rest distance from the foot.
    #[default]
    LegDistance,
    /// Descend on the error against both rest distances.
    Score,
}

/// Orbit anchor solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Solver used for the orbit anchors.
    pub mode: OrbitMode,
    /// Radius of each arc-cast link while walking toward a solution.
    pub arc_radius: f32,
    /// Most arc-cast steps per leg per solve.
    pub iteration_cap: usize,
    /// Sweep of the arc cast, in degrees.
    pub arc_angle: f32,
    /// Segments in the arc cast.
    pub arc_resolution: u32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            mode: OrbitMode::LegDistance,
            arc_radius: ORBIT_ARC_RADIUS,
            iteration_cap: ORBIT_ITERATION_CAP,
            arc_angle: ARC_ANGLE,
            arc_resolution: ARC_RESOLUTION,
        }
    }
}

/// Step timing and shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Full cycle: both leg groups step once.
    pub period: f32,
    /// Time a foot spends in the air.
    pub duration: f32,
    /// Peak lift of a stepping foot.
    pub height: f32,
    /// Lift profile over the step.
    pub curve: HeightCurve,
    /// Upper bound of the random delay before each leg lifts.
    pub jitter: f32,
    /// Scales the wait between the two groups.
    pub desync: f32,
    /// Speed progress below which step sounds are muted.
    pub audio_min_progress: f32,
    /// Random spread on footstep pitch.
    pub pitch_jitter: f32,
    /// Arc length of each segment when propagating a step end point.
    pub segment: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            period: STEP_PERIOD,
            duration: STEP_DURATION,
            height: STEP_HEIGHT,
            curve: HeightCurve::default(),
            jitter: STEP_JITTER,
            desync: STEP_DESYNC,
            audio_min_progress: STEP_AUDIO_MIN_PROGRESS,
            pitch_jitter: STEP_PITCH_JITTER,
            segment: STEP_SEGMENT,
        }
    }
}

/// Radial foothold scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Radial arms cast around the origin.
    pub arms: u32,
    /// Maximum samples per arm.
    pub resolution: usize,
    /// Radius of each arc cast along an arm.
    pub radius: f32,
    /// First-link radius growth per unit of velocity along the arm.
    pub velocity_bias: f32,
    /// Later samples along an arm weigh less.
    pub distance_weighting: bool,
    /// Sweep of the arc cast, in degrees.
    pub arc_angle: f32,
    /// Segments in the arc cast.
    pub arc_resolution: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            arms: SCAN_ARMS,
            resolution: SCAN_RESOLUTION,
            radius: SCAN_RADIUS,
            velocity_bias: SCAN_VELOCITY_BIAS,
            distance_weighting: true,
            arc_angle: ARC_ANGLE,
            arc_resolution: ARC_RESOLUTION,
        }
    }
}

/// Leg layout and gait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegRigConfig {
    /// Rest layout of every leg.
    pub legs: Vec<LegLayout>,
    /// Indices of the legs that step together first; the rest form the
    /// second group.
    pub group_a: Vec<usize>,
    /// Orbit anchor solving.
    pub orbit: OrbitConfig,
    /// Step timing and shape.
    pub step: StepConfig,
    /// Foothold scan used to place steps.
    pub scan: ScanConfig,
}

impl Default for LegRigConfig {
    fn default() -> Self {
        // Four legs per side, alternating tetrapod gait.
        let legs = [-0.3_f32, -0.1, 0.1, 0.3]
            .iter()
            .flat_map(|&z| {
                [-1.0_f32, 1.0].map(move |side| LegLayout {
                    foot: Vec3::new(side * 0.5, 0.0, z * 1.5),
                    orbit: Vec3::new(side * 0.25, 0.0, z),
                })
            })
            .collect();
        Self {
            legs,
            group_a: vec![0, 3, 4, 7],
            orbit: OrbitConfig::default(),
            step: StepConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl MonsterConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`MonsterConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let json = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every value the simulation relies on.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_health", self.max_health)?;

        let c = &self.combat;
        fraction("combat.kamikaze_threshold", c.kamikaze_threshold)?;
        positive("combat.chase_range", c.chase_range)?;
        positive("combat.attack_range", c.attack_range)?;
        if c.attack_range > c.chase_range {
            return Err(ConfigError::invalid(
                "combat.attack_range",
                "must not exceed chase_range",
            ));
        }
        non_negative("combat.attack_damage", c.attack_damage)?;
        non_negative("combat.attack_cooldown", c.attack_cooldown)?;
        non_negative("combat.attack_hit_delay", c.attack_hit_delay)?;
        positive("combat.attack_duration", c.attack_duration)?;
        non_negative("combat.charge_delay", c.charge_delay)?;
        non_negative("combat.explosion_radius", c.explosion_radius)?;
        non_negative("combat.explosion_damage", c.explosion_damage)?;
        non_negative("combat.kamikaze_fuse", c.kamikaze_fuse)?;
        non_negative("combat.kamikaze_duration", c.kamikaze_duration)?;

        let t = &self.timing;
        non_negative("timing.hurt_duration", t.hurt_duration)?;
        non_negative("timing.idle_time_before_dive", t.idle_time_before_dive)?;
        non_negative("timing.dive_speed", t.dive_speed)?;
        non_negative("timing.dive_duration", t.dive_duration)?;
        non_negative("timing.dive_obstruction_distance", t.dive_obstruction_distance)?;
        positive("timing.max_hold_time", t.max_hold_time)?;
        non_negative("timing.hold_shake_amplitude", t.hold_shake_amplitude)?;
        non_negative("timing.death_scale_delay", t.death_scale_delay)?;
        non_negative("timing.scale_down_duration", t.scale_down_duration)?;
        positive("timing.stuck_timeout", t.stuck_timeout)?;
        non_negative("timing.stuck_speed", t.stuck_speed)?;
        non_negative("timing.wander_delay", t.wander_delay)?;
        non_negative("timing.wander_radius", t.wander_radius)?;
        positive("timing.wander_timeout", t.wander_timeout)?;
        non_negative("timing.arrive_distance", t.arrive_distance)?;
        if t.wander_enabled && t.wander_radius <= t.arrive_distance {
            return Err(ConfigError::invalid(
                "timing.wander_radius",
                "must exceed arrive_distance when wandering",
            ));
        }

        let l = &self.locomotion;
        if !l.acceleration.is_finite() || l.acceleration.min_element() < 0.0 {
            return Err(ConfigError::invalid(
                "locomotion.acceleration",
                "components must be finite and non-negative",
            ));
        }
        non_negative("locomotion.friction", l.friction)?;
        non_negative("locomotion.transient_friction", l.transient_friction)?;
        positive("locomotion.max_speed", l.max_speed)?;
        positive("locomotion.arc_angle", l.arc_angle)?;
        nonzero("locomotion.arc_resolution", l.arc_resolution as usize)?;
        positive("locomotion.ground_probe_distance", l.ground_probe_distance)?;
        non_negative("locomotion.comfort_distance", l.comfort_distance)?;
        if l.surface_layers().is_empty() {
            return Err(ConfigError::invalid(
                "locomotion.surface_mask",
                "must name at least one known layer",
            ));
        }

        self.validate_legs()
    }

    fn validate_legs(&self) -> Result<(), ConfigError> {
        let rig = &self.legs;
        if rig.legs.is_empty() {
            return Err(ConfigError::invalid("legs.legs", "rig needs at least one leg"));
        }
        if rig.legs.iter().any(|l| !l.foot.is_finite() || !l.orbit.is_finite()) {
            return Err(ConfigError::invalid("legs.legs", "layout must be finite"));
        }
        if let Some(bad) = rig.group_a.iter().find(|&&i| i >= rig.legs.len()) {
            return Err(ConfigError::invalid(
                "legs.group_a",
                format!("index {bad} out of range for {} legs", rig.legs.len()),
            ));
        }
        positive("legs.orbit.arc_radius", rig.orbit.arc_radius)?;
        nonzero("legs.orbit.iteration_cap", rig.orbit.iteration_cap)?;
        positive("legs.orbit.arc_angle", rig.orbit.arc_angle)?;
        nonzero("legs.orbit.arc_resolution", rig.orbit.arc_resolution as usize)?;

        let s = &rig.step;
        positive("legs.step.period", s.period)?;
        positive("legs.step.duration", s.duration)?;
        non_negative("legs.step.height", s.height)?;
        non_negative("legs.step.jitter", s.jitter)?;
        positive("legs.step.desync", s.desync)?;
        fraction("legs.step.audio_min_progress", s.audio_min_progress)?;
        non_negative("legs.step.pitch_jitter", s.pitch_jitter)?;
        positive("legs.step.segment", s.segment)?;
        s.curve.validate()?;

        let sc = &rig.scan;
        at_most("legs.scan.arms", sc.arms as usize, MAX_SCAN_ARMS as usize)?;
        at_most("legs.scan.resolution", sc.resolution, MAX_SCAN_RESOLUTION)?;
        positive("legs.scan.radius", sc.radius)?;
        non_negative("legs.scan.velocity_bias", sc.velocity_bias)?;
        positive("legs.scan.arc_angle", sc.arc_angle)?;
        nonzero("legs.scan.arc_resolution", sc.arc_resolution as usize)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be non-negative")))
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must lie in 0..=1")))
    }
}

fn nonzero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::invalid(field, "must be non-zero"))
    } else {
        Ok(())
    }
}

fn at_most(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    nonzero(field, value)?;
    if value > max {
        Err(ConfigError::invalid(field, format!("{value} exceeds {max}")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        MonsterConfig::default()
            .validate()
            .expect("default config should validate");
    }

    #[rstest]
    fn partial_json_keeps_defaults() {
        let config = MonsterConfig::from_json_str(
            r#"{ "max_health": 80.0, "combat": { "attack_range": 1.5 } }"#,
        )
        .expect("valid json");
        assert_relative_eq!(config.max_health, 80.0);
        assert_relative_eq!(config.combat.attack_range, 1.5);
        assert_relative_eq!(config.combat.chase_range, CHASE_RANGE);
        assert_eq!(config.legs.legs.len(), 8);
    }

    #[rstest]
    fn orbit_mode_is_snake_case() {
        let config =
            MonsterConfig::from_json_str(r#"{ "legs": { "orbit": { "mode": "score" } } }"#)
                .expect("valid json");
        assert_eq!(config.legs.orbit.mode, OrbitMode::Score);
    }

    #[rstest]
    #[case::threshold(r#"{ "combat": { "kamikaze_threshold": 1.5 } }"#, "combat.kamikaze_threshold")]
    #[case::range(r#"{ "combat": { "attack_range": 20.0 } }"#, "combat.attack_range")]
    #[case::group(r#"{ "legs": { "group_a": [0, 9] } }"#, "legs.group_a")]
    #[case::no_legs(r#"{ "legs": { "legs": [] } }"#, "legs.legs")]
    #[case::period(r#"{ "legs": { "step": { "period": 0.0 } } }"#, "legs.step.period")]
    #[case::mask(r#"{ "locomotion": { "surface_mask": 0 } }"#, "locomotion.surface_mask")]
    #[case::scan_arms(r#"{ "legs": { "scan": { "arms": 4096 } } }"#, "legs.scan.arms")]
    #[case::scan_resolution(
        r#"{ "legs": { "scan": { "resolution": 1000000000 } } }"#,
        "legs.scan.resolution"
    )]
    #[case::wander_radius(
        r#"{ "timing": { "wander_enabled": true, "wander_radius": 0.2 } }"#,
        "timing.wander_radius"
    )]
    fn invalid_values_name_their_field(#[case] json: &str, #[case] expected: &str) {
        match MonsterConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn short_wander_radius_is_fine_while_wander_is_off() {
        let config = MonsterConfig::from_json_str(r#"{ "timing": { "wander_radius": 0.0 } }"#)
            .expect("wander disabled");
        assert_relative_eq!(config.timing.wander_radius, 0.0);
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            MonsterConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            MonsterConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
