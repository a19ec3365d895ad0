//! Hit points with an explicit observer list.
//!
//! Observers subscribe with a callback and receive every [`HealthEvent`]
//! synchronously. Subscriptions are released explicitly with
//! [`Health::unsubscribe`] when the listening entity goes away.

use std::fmt;

use log::trace;

/// Notification published after a health mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthEvent {
    /// Any change of the current value.
    Changed {
        /// Hit points after the change.
        current: f32,
        /// Pool maximum.
        max: f32,
    },
    /// Non-zero damage was applied.
    Damaged {
        /// Damage actually dealt.
        amount: f32,
        /// Hit points left.
        current: f32,
    },
    /// Health was restored.
    Healed {
        /// Hit points actually restored.
        amount: f32,
        /// Hit points after healing.
        current: f32,
    },
    /// Health reached zero. Published once per life.
    Died,
}

/// Handle returned by [`Health::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&HealthEvent) + Send + Sync>;

/// Current and maximum hit points.
pub struct Health {
    current: f32,
    max: f32,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl fmt::Debug for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Health")
            .field("current", &self.current)
            .field("max", &self.max)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Health {
    /// Creates a full health pool. Non-positive maxima are clamped to one.
    #[must_use]
    pub fn new(requested: f32) -> Self {
        let max = if requested.is_finite() && requested > 0.0 {
            requested
        } else {
            1.0
        };
        Self {
            current: max,
            max,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Size of the pool.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Current health as a fraction of the maximum.
    #[must_use]
    pub const fn percentage(&self) -> f32 {
        self.current / self.max
    }

    /// `true` once the pool is empty.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Applies `amount` damage and returns the damage actually dealt.
    ///
    /// Dead pools and non-positive amounts are left untouched.
    pub fn damage(&mut self, amount: f32) -> f32 {
        if self.is_dead() || !(amount > 0.0) {
            return 0.0;
        }
        let dealt = amount.min(self.current);
        self.current -= dealt;
        trace!("health {}/{} after {dealt} damage", self.current, self.max);
        self.publish(HealthEvent::Damaged {
            amount: dealt,
            current: self.current,
        });
        self.publish_changed();
        if self.is_dead() {
            self.publish(HealthEvent::Died);
        }
        dealt
    }

    /// Restores up to `amount` health. Dead pools cannot be healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead() || !(amount > 0.0) {
            return 0.0;
        }
        let healed = amount.min(self.max - self.current);
        if healed <= 0.0 {
            return 0.0;
        }
        self.current += healed;
        self.publish(HealthEvent::Healed {
            amount: healed,
            current: self.current,
        });
        self.publish_changed();
        healed
    }

    /// Refills the pool, reviving it if dead.
    pub fn restore_full(&mut self) {
        if (self.current - self.max).abs() > f32::EPSILON {
            self.current = self.max;
            self.publish_changed();
        }
    }

    /// Registers an observer for every later [`HealthEvent`].
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&HealthEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` when the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        before != self.observers.len()
    }

    fn publish_changed(&mut self) {
        self.publish(HealthEvent::Changed {
            current: self.current,
            max: self.max,
        });
    }

    fn publish(&mut self, event: HealthEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }
}
