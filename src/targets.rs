//! Registry of entities monsters may hunt.
//!
//! Monsters hold a [`TargetId`] rather than the target itself. Every lookup
//! goes back through the directory, so a target that was removed simply
//! stops resolving.

use bevy::prelude::Resource;
use glam::Vec3;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;

/// Weak handle to a registered target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Kind of entity a target represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetTag {
    /// The objective monsters go for first (the tree).
    Priority,
    /// A player avatar.
    Player,
}

/// Snapshot of a target as stored by the directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedTarget {
    /// Kind of target.
    pub tag: TargetTag,
    /// Last reported world position.
    pub position: Vec3,
}

/// Target directory service, constructed explicitly and shared by reference.
#[derive(Resource, Debug, Default, Clone)]
pub struct TargetDirectory {
    targets: HashMap<TargetId, TrackedTarget>,
    next_id: u64,
}

impl TargetDirectory {
    /// Empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target and returns its handle.
    pub fn insert(&mut self, tag: TargetTag, position: Vec3) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, TrackedTarget { tag, position });
        id
    }

    /// Moves a target. Returns `false` when the id no longer resolves.
    pub fn set_position(&mut self, id: TargetId, position: Vec3) -> bool {
        self.targets
            .get_mut(&id)
            .map(|t| t.position = position)
            .is_some()
    }

    /// Unregisters a target, returning its last snapshot.
    pub fn remove(&mut self, id: TargetId) -> Option<TrackedTarget> {
        self.targets.remove(&id)
    }

    /// Snapshot of a live target.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&TrackedTarget> {
        self.targets.get(&id)
    }

    /// Position of a live target.
    #[must_use]
    pub fn position(&self, id: TargetId) -> Option<Vec3> {
        self.get(id).map(|t| t.position)
    }

    /// Number of registered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Nearest target with the given tag, by straight-line distance.
    ///
    /// Ties resolve to the lowest id so repeated queries are stable.
    #[must_use]
    pub fn nearest_tagged(&self, tag: TargetTag, from: Vec3) -> Option<(TargetId, Vec3)> {
        self.targets
            .iter()
            .filter(|(_, t)| t.tag == tag)
            .min_by_key(|(id, t)| (OrderedFloat(t.position.distance_squared(from)), **id))
            .map(|(id, t)| (*id, t.position))
    }

    /// Picks the hunt target: the nearest priority objective, otherwise the
    /// nearest player.
    #[must_use]
    pub fn acquire(&self, from: Vec3) -> Option<TargetId> {
        self.nearest_tagged(TargetTag::Priority, from)
            .or_else(|| self.nearest_tagged(TargetTag::Player, from))
            .map(|(id, _)| id)
    }

    /// Ids of every target within `radius` of `center`.
    #[must_use]
    pub fn within(&self, center: Vec3, radius: f32) -> Vec<TargetId> {
        let r2 = radius * radius;
        let mut ids: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|(_, t)| t.position.distance_squared(center) <= r2)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn directory() -> TargetDirectory {
        TargetDirectory::new()
    }

    #[rstest]
    fn priority_beats_closer_player(mut directory: TargetDirectory) {
        let tree = directory.insert(TargetTag::Priority, Vec3::new(50.0, 0.0, 0.0));
        directory.insert(TargetTag::Player, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(directory.acquire(Vec3::ZERO), Some(tree));
    }

    #[rstest]
    fn falls_back_to_nearest_player(mut directory: TargetDirectory) {
        directory.insert(TargetTag::Player, Vec3::new(9.0, 0.0, 0.0));
        let near = directory.insert(TargetTag::Player, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(directory.acquire(Vec3::ZERO), Some(near));
    }

    #[rstest]
    fn removed_targets_stop_resolving(mut directory: TargetDirectory) {
        let id = directory.insert(TargetTag::Player, Vec3::ZERO);
        directory.remove(id);
        assert!(directory.position(id).is_none());
        assert!(!directory.set_position(id, Vec3::ONE));
        assert_eq!(directory.acquire(Vec3::ZERO), None);
    }

    #[rstest]
    fn within_is_sorted_and_inclusive(mut directory: TargetDirectory) {
        let a = directory.insert(TargetTag::Player, Vec3::new(2.0, 0.0, 0.0));
        let b = directory.insert(TargetTag::Priority, Vec3::new(0.0, 1.0, 0.0));
        directory.insert(TargetTag::Player, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(directory.within(Vec3::ZERO, 2.0), vec![a, b]);
    }
}
