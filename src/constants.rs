//! Default tuning used when a configuration omits a value.
//!
//! Distances are metres, times are seconds, angles are degrees.

/// Starting and maximum hit points.
pub const DEFAULT_MAX_HEALTH: f32 = 150.0;
/// Health fraction at or below which the monster turns kamikaze.
pub const KAMIKAZE_THRESHOLD: f32 = 0.19;
/// Targets further than this are ignored.
pub const CHASE_RANGE: f32 = 12.0;
/// Distance at which a chase turns into a charge.
pub const ATTACK_RANGE: f32 = 2.0;
/// Damage dealt by a landed attack.
pub const ATTACK_DAMAGE: f32 = 10.0;
/// Pause between attacks.
pub const ATTACK_COOLDOWN: f32 = 1.5;
/// Delay from the start of an attack to the hit test.
pub const ATTACK_HIT_DELAY: f32 = 0.3;
/// Length of the attack animation.
pub const ATTACK_DURATION: f32 = 0.8;
/// Wind-up before the attack fires.
pub const CHARGE_DELAY: f32 = 0.6;
/// Reach of the kamikaze blast.
pub const EXPLOSION_RADIUS: f32 = 3.0;
/// Damage dealt to every target inside the blast.
pub const EXPLOSION_DAMAGE: f32 = 40.0;
/// Time from entering Kamikaze to detonation.
pub const KAMIKAZE_FUSE: f32 = 0.9;
/// Length of the kamikaze animation.
pub const KAMIKAZE_DURATION: f32 = 1.2;
/// Length of the stagger after taking damage.
pub const HURT_DURATION: f32 = 0.5;
/// Idle time before a random dive.
pub const IDLE_TIME_BEFORE_DIVE: f32 = 5.0;
/// Speed of a dive.
pub const DIVE_SPEED: f32 = 4.0;
/// Longest a dive lasts.
pub const DIVE_DURATION: f32 = 1.5;
/// A dive stops when a surface is this close ahead.
pub const DIVE_OBSTRUCTION_DISTANCE: f32 = 0.4;
/// Longest an interactor can hold the monster before it breaks free.
pub const MAX_HOLD_TIME: f32 = 4.0;
/// Fraction of [`MAX_HOLD_TIME`] after which a held monster starts shaking.
pub const HOLD_SHAKE_FRACTION: f32 = 0.8;
/// Largest shake offset on each axis.
pub const HOLD_SHAKE_AMPLITUDE: f32 = 0.02;
/// Delay after death before the body shrinks.
pub const DEATH_SCALE_DELAY: f32 = 1.0;
/// Time taken to shrink to nothing.
pub const SCALE_DOWN_DURATION: f32 = 0.5;
/// A chase slower than [`STUCK_SPEED`] for this long gives up.
pub const STUCK_TIMEOUT: f32 = 3.0;
/// Speed below which a chasing monster counts as stuck.
pub const STUCK_SPEED: f32 = 0.05;
/// Idle time before wandering, when wandering is enabled.
pub const WANDER_DELAY: f32 = 2.0;
/// Furthest a wander destination lies from the body.
pub const WANDER_RADIUS: f32 = 4.0;
/// Longest a single wander lasts.
pub const WANDER_TIMEOUT: f32 = 6.0;
/// A destination this close counts as reached.
pub const ARRIVE_DISTANCE: f32 = 0.3;

/// Lateral acceleration.
pub const ACCELERATION_X: f32 = 6.0;
/// Forward acceleration.
pub const ACCELERATION_Z: f32 = 6.0;
/// Friction while steering.
pub const FRICTION: f32 = 4.0;
/// Extra friction applied to impulses once they decay.
pub const TRANSIENT_FRICTION: f32 = 2.0;
/// Walking speed cap.
pub const MAX_SPEED: f32 = 1.0;
/// Sweep of the arc cast used to follow surfaces.
pub const MOVE_ARC_ANGLE: f32 = 270.0;
/// Segments in the movement arc cast.
pub const MOVE_ARC_RESOLUTION: u32 = 6;
/// Reach of the downward ground check.
pub const GROUND_PROBE_DISTANCE: f32 = 0.3;
/// Within this distance of a player the monster halts (VR comfort).
pub const COMFORT_DISTANCE: f32 = 0.35;

/// Time between steps of one leg group.
pub const STEP_PERIOD: f32 = 0.4;
/// Time a foot spends in the air.
pub const STEP_DURATION: f32 = 0.2;
/// Peak lift of a stepping foot.
pub const STEP_HEIGHT: f32 = 0.15;
/// Random spread on step timing.
pub const STEP_JITTER: f32 = 0.05;
/// Scales the wait between the two alternating leg groups.
pub const STEP_DESYNC: f32 = 1.0;
/// Speed fraction below which steps are silent.
pub const STEP_AUDIO_MIN_PROGRESS: f32 = 0.2;
/// Random spread on footstep pitch.
pub const STEP_PITCH_JITTER: f32 = 0.1;
/// Arc length of each segment used when propagating a step end point.
pub const STEP_SEGMENT: f32 = 0.1;

/// Hard cap on orbit-solver iterations per leg per solve.
pub const ORBIT_ITERATION_CAP: usize = 50;
/// Radius of the arc cast around each orbit point.
pub const ORBIT_ARC_RADIUS: f32 = 0.05;
/// Sweep of the orbit arc cast.
pub const ARC_ANGLE: f32 = 270.0;
/// Segments in the orbit arc cast.
pub const ARC_RESOLUTION: u32 = 8;

/// Radial arms in a foothold scan.
pub const SCAN_ARMS: u32 = 8;
/// Samples along each scan arm.
pub const SCAN_RESOLUTION: usize = 6;
/// Upper bound on scan arms; the candidate buffer holds arms times samples.
pub const MAX_SCAN_ARMS: u32 = 64;
/// Upper bound on samples per scan arm.
pub const MAX_SCAN_RESOLUTION: usize = 64;
/// Radius of each arc cast along a scan arm.
pub const SCAN_RADIUS: f32 = 0.15;
/// First-link radius growth per unit of velocity along the arm.
pub const SCAN_VELOCITY_BIAS: f32 = 0.1;
