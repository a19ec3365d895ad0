//! Finite-state controller.
//!
//! Exactly one state is active. A transition runs the old state's `on_exit`
//! and then the new state's `on_enter` back to back, with no tick between.
//! Timers live inside the state values, so leaving a state drops (and thereby
//! cancels) anything it had scheduled.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::context::StateContext;
use super::events::MonsterEvent;
use super::states;

/// Discriminant of every behaviour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Waiting for a target; dives or wanders after a while.
    Idle,
    /// Walking toward the cached target.
    Chase,
    /// Winding up an attack.
    Charge,
    /// Swinging at the target.
    Attack,
    /// Running at the target until the blast.
    Kamikaze,
    /// Staggered by damage.
    Hurt,
    /// Lunging forward.
    Dive,
    /// Carried by an interactor, or falling after a release.
    Held,
    /// Terminal until reset.
    Dead,
    /// Strolling to a random point.
    Wander,
}

impl StateKind {
    /// Fresh state value with zeroed timers.
    #[must_use]
    pub fn instantiate(self) -> Box<dyn State> {
        match self {
            Self::Idle => Box::<states::Idle>::default(),
            Self::Chase => Box::<states::Chase>::default(),
            Self::Charge => Box::<states::Charge>::default(),
            Self::Attack => Box::<states::Attack>::default(),
            Self::Kamikaze => Box::<states::Kamikaze>::default(),
            Self::Hurt => Box::<states::Hurt>::default(),
            Self::Dive => Box::<states::Dive>::default(),
            Self::Held => Box::<states::Held>::default(),
            Self::Dead => Box::<states::Dead>::default(),
            Self::Wander => Box::<states::Wander>::default(),
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One behaviour of the monster.
///
/// `tick` returns the next state to move to, if any; the machine performs
/// the transition so states never re-enter the machine themselves.
pub trait State: Send + Sync + fmt::Debug {
    /// Discriminant of this state.
    fn kind(&self) -> StateKind;

    /// Entry actions.
    fn on_enter(&mut self, _ctx: &mut StateContext<'_, '_>) {}

    /// Per-frame update.
    fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) -> Option<StateKind>;

    /// Exit actions.
    fn on_exit(&mut self, _ctx: &mut StateContext<'_, '_>) {}
}

/// Owns the active state and performs transitions.
#[derive(Debug)]
pub struct StateMachine {
    current: Box<dyn State>,
    entered: bool,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(StateKind::Idle)
    }
}

impl StateMachine {
    /// Machine whose initial state is entered lazily on first use, once
    /// collaborators have been attached.
    #[must_use]
    pub fn new(initial: StateKind) -> Self {
        Self {
            current: initial.instantiate(),
            entered: false,
        }
    }

    /// Active state.
    #[must_use]
    pub fn kind(&self) -> StateKind {
        self.current.kind()
    }

    /// Runs the initial `on_enter` if it has not run yet.
    pub fn start(&mut self, ctx: &mut StateContext<'_, '_>) {
        if !self.entered {
            self.entered = true;
            let kind = self.current.kind();
            debug!("entering initial state {kind}");
            ctx.body.emit(MonsterEvent::StateEntered(kind));
            self.current.on_enter(ctx);
        }
    }

    /// Ticks the active state and applies the transition it asks for.
    pub fn tick(&mut self, ctx: &mut StateContext<'_, '_>, dt: f32) {
        self.start(ctx);
        if let Some(next) = self.current.tick(ctx, dt) {
            self.change_state(ctx, next);
        }
    }

    /// Moves to `next`.
    ///
    /// Returns `false` without side effects when `next` is already active or
    /// the machine is dead.
    pub fn change_state(&mut self, ctx: &mut StateContext<'_, '_>, next: StateKind) -> bool {
        self.start(ctx);
        let current = self.current.kind();
        if current == next {
            return false;
        }
        if current == StateKind::Dead {
            debug!("ignoring {next} request while dead");
            return false;
        }
        self.swap(ctx, next);
        true
    }

    /// Transition that skips the self and dead guards.
    pub fn force_state(&mut self, ctx: &mut StateContext<'_, '_>, next: StateKind) {
        self.start(ctx);
        self.swap(ctx, next);
    }

    fn swap(&mut self, ctx: &mut StateContext<'_, '_>, next: StateKind) {
        let previous = self.current.kind();
        self.current.on_exit(ctx);
        ctx.body.emit(MonsterEvent::StateExited(previous));
        debug!("state {previous} -> {next}");
        self.current = next.instantiate();
        ctx.body.emit(MonsterEvent::StateEntered(next));
        self.current.on_enter(ctx);
    }
}
