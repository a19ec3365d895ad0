//! Observable reactions, queued on the monster until its owner drains them.

use glam::Vec3;

use super::StateKind;
use crate::collaborators::StepCue;
use crate::targets::TargetId;

/// Something the monster did that other systems may care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonsterEvent {
    /// The state's exit actions ran.
    StateExited(StateKind),
    /// The state's entry actions are about to run.
    StateEntered(StateKind),
    /// An attack connected with its target.
    AttackHit {
        /// Target that was hit.
        target: TargetId,
    },
    /// Damage the owner should apply to a target's health.
    DealtDamage {
        /// Target to damage.
        target: TargetId,
        /// Hit points to remove.
        amount: f32,
    },
    /// The kamikaze blast went off.
    Exploded {
        /// Centre of the blast.
        position: Vec3,
        /// Reach of the blast.
        radius: f32,
        /// Damage dealt inside the radius.
        damage: f32,
    },
    /// A held monster broke free of its interactor.
    HoldBroken,
    /// Entered the dead state.
    Died,
    /// Scale-down finished; the monster can go back to its pool.
    ReadyForPool,
    /// A leg reached a sound cue of its step.
    Step {
        /// Point of the step.
        cue: StepCue,
        /// Index of the leg.
        leg: usize,
    },
}
