//! Capabilities a monster borrows from the host engine.
//!
//! Navigation, animation playback and audio are owned by the engine; the
//! monster only issues commands and reads back a little state. Every
//! collaborator is optional on the monster: a missing one silently skips the
//! dependent action.

use glam::Vec3;

/// Path-following agent attached to a monster.
pub trait NavAgent: Send + Sync {
    /// Switches path following on or off.
    fn set_enabled(&mut self, enabled: bool);
    /// Whether the agent is switched on.
    fn is_enabled(&self) -> bool;
    /// Requests a path to `destination`.
    fn set_destination(&mut self, destination: Vec3);
    /// Halts path following without discarding the path.
    fn stop(&mut self);
    /// Continues along the current path after [`NavAgent::stop`].
    fn resume(&mut self);
    /// Whether the agent is halted.
    fn is_stopped(&self) -> bool;
    /// Distance left along the current path.
    fn remaining_distance(&self) -> f32;
    /// Whether a requested path is still being computed.
    fn path_pending(&self) -> bool;
    /// Next corner of the current path, if any.
    fn next_waypoint(&self) -> Option<Vec3>;
    /// Current agent speed in metres per second.
    fn speed(&self) -> f32;
}

/// Parameter-driven animation player.
pub trait Animator: Send + Sync {
    /// Sets a boolean parameter.
    fn set_bool(&mut self, name: &str, value: bool);
    /// Fires a one-shot trigger.
    fn set_trigger(&mut self, name: &str);
    /// Clears a trigger that has not been consumed yet.
    fn reset_trigger(&mut self, name: &str);
    /// Whether the base layer is currently playing the named state.
    fn is_in_state(&self, name: &str) -> bool;
    /// Normalised playback progress of the current base-layer state.
    fn normalized_time(&self) -> f32;
}

/// Which point of a step a sound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepCue {
    /// Foot lifts off.
    Start,
    /// Foot is travelling.
    Move,
    /// Foot lands.
    End,
}

/// Sink for leg step sounds.
pub trait StepAudio: Send + Sync {
    /// Plays `cue` for leg `leg` at `position` with a pitch multiplier.
    fn play(&mut self, cue: StepCue, leg: usize, position: Vec3, pitch: f32);
}

/// Animator parameter names shared by the monster states.
pub mod params {
    /// Bool: standing on a surface.
    pub const GROUNDED: &str = "Grounded";
    /// Bool: walking toward a destination.
    pub const MOVING: &str = "Moving";
    /// Trigger: attack swing.
    pub const ATTACK: &str = "Attack";
    /// Trigger: charge wind-up.
    pub const CHARGE: &str = "Charge";
    /// Trigger: stagger.
    pub const HURT: &str = "Hurt";
    /// Trigger: dive.
    pub const DIVE: &str = "Dive";
    /// Trigger and animator state: self-destruct run.
    pub const KAMIKAZE: &str = "Kamikaze";
    /// Trigger: death.
    pub const DEAD: &str = "Dead";
    /// Bool: held by an interactor.
    pub const HELD: &str = "Held";

    /// Triggers cleared whenever the monster settles back into idle.
    pub const TRIGGERS: [&str; 6] = [ATTACK, CHARGE, HURT, DIVE, KAMIKAZE, DEAD];
}
