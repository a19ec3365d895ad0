//! Recording collaborators.
//!
//! Each recorder shares its log through an `Arc<Mutex<_>>`; clone the
//! recorder before handing it to a monster and read the log through the
//! clone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use skitter::{Animator, NavAgent, StepAudio, StepCue};

fn lock<T>(log: &Mutex<T>) -> MutexGuard<'_, T> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything a [`RecordingAgent`] was told, plus the answers it gives.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentLog {
    pub enabled: bool,
    pub stopped: bool,
    pub destination: Option<Vec3>,
    pub destinations_set: usize,
    pub stops: usize,
    pub resumes: usize,
    pub remaining_distance: f32,
    pub path_pending: bool,
    pub speed: f32,
}

impl Default for AgentLog {
    fn default() -> Self {
        Self {
            enabled: true,
            stopped: false,
            destination: None,
            destinations_set: 0,
            stops: 0,
            resumes: 0,
            remaining_distance: f32::INFINITY,
            path_pending: false,
            speed: 1.0,
        }
    }
}

/// Navigation agent that walks straight at its destination.
#[derive(Debug, Clone, Default)]
pub struct RecordingAgent(pub Arc<Mutex<AgentLog>>);

impl RecordingAgent {
    #[must_use]
    pub fn log(&self) -> AgentLog {
        lock(&self.0).clone()
    }

    /// Adjusts the scripted answers.
    pub fn script(&self, f: impl FnOnce(&mut AgentLog)) {
        f(&mut lock(&self.0));
    }
}

impl NavAgent for RecordingAgent {
    fn set_enabled(&mut self, enabled: bool) {
        lock(&self.0).enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        lock(&self.0).enabled
    }

    fn set_destination(&mut self, destination: Vec3) {
        let mut log = lock(&self.0);
        log.destination = Some(destination);
        log.destinations_set += 1;
    }

    fn stop(&mut self) {
        let mut log = lock(&self.0);
        log.stopped = true;
        log.stops += 1;
    }

    fn resume(&mut self) {
        let mut log = lock(&self.0);
        log.stopped = false;
        log.resumes += 1;
    }

    fn is_stopped(&self) -> bool {
        lock(&self.0).stopped
    }

    fn remaining_distance(&self) -> f32 {
        lock(&self.0).remaining_distance
    }

    fn path_pending(&self) -> bool {
        lock(&self.0).path_pending
    }

    fn next_waypoint(&self) -> Option<Vec3> {
        lock(&self.0).destination
    }

    fn speed(&self) -> f32 {
        lock(&self.0).speed
    }
}

/// Parameter history of a [`RecordingAnimator`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatorLog {
    pub bools: HashMap<String, bool>,
    /// Triggers in the order they were set.
    pub triggers: Vec<String>,
    pub resets: Vec<String>,
    /// State reported by `is_in_state`.
    pub current_state: Option<String>,
    pub normalized_time: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator(pub Arc<Mutex<AnimatorLog>>);

impl RecordingAnimator {
    #[must_use]
    pub fn log(&self) -> AnimatorLog {
        lock(&self.0).clone()
    }

    pub fn script(&self, f: impl FnOnce(&mut AnimatorLog)) {
        f(&mut lock(&self.0));
    }

    #[must_use]
    pub fn bool_param(&self, name: &str) -> Option<bool> {
        lock(&self.0).bools.get(name).copied()
    }

    #[must_use]
    pub fn trigger_count(&self, name: &str) -> usize {
        lock(&self.0).triggers.iter().filter(|t| *t == name).count()
    }
}

impl Animator for RecordingAnimator {
    fn set_bool(&mut self, name: &str, value: bool) {
        lock(&self.0).bools.insert(name.to_owned(), value);
    }

    fn set_trigger(&mut self, name: &str) {
        lock(&self.0).triggers.push(name.to_owned());
    }

    fn reset_trigger(&mut self, name: &str) {
        lock(&self.0).resets.push(name.to_owned());
    }

    fn is_in_state(&self, name: &str) -> bool {
        lock(&self.0).current_state.as_deref() == Some(name)
    }

    fn normalized_time(&self) -> f32 {
        lock(&self.0).normalized_time
    }
}

/// Step sounds, in play order.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio(pub Arc<Mutex<Vec<(StepCue, usize, f32)>>>);

impl RecordingAudio {
    /// `(cue, leg, pitch)` for every sound played.
    #[must_use]
    pub fn played(&self) -> Vec<(StepCue, usize, f32)> {
        lock(&self.0).clone()
    }
}

impl StepAudio for RecordingAudio {
    fn play(&mut self, cue: StepCue, leg: usize, _position: Vec3, pitch: f32) {
        lock(&self.0).push((cue, leg, pitch));
    }
}
