//! Shared fixtures for `skitter` integration tests.
//!
//! [`arena`] builds collision worlds and a small harness that ticks one
//! monster the way the Bevy plugin would. [`collaborators`] provides
//! recording implementations of the engine traits whose call logs stay
//! inspectable after the recorder has been moved into a monster.

pub mod arena;
pub mod collaborators;

pub use arena::{flat_floor, floor_with_wall, Arena, FIXED_DT, FRAME_DT};
pub use collaborators::{AgentLog, AnimatorLog, RecordingAgent, RecordingAnimator, RecordingAudio};
