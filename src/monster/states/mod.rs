//! Behaviour states.

mod attack;
mod charge;
mod chase;
mod dead;
mod dive;
mod held;
mod hurt;
mod idle;
mod kamikaze;
mod wander;

pub use attack::Attack;
pub use charge::Charge;
pub use chase::Chase;
pub use dead::Dead;
pub use dive::Dive;
pub use held::Held;
pub use hurt::Hurt;
pub use idle::Idle;
pub use kamikaze::{detonate, Kamikaze};
pub use wander::Wander;
