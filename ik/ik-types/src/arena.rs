//! Bone storage.
//!
//! Constraints reference bones without owning them. The [`BoneSet`] arena is
//! the lifetime authority: it owns every bone, and constraints hold plain
//! [`BoneId`] handles that are resolved on each solver pass. Handles stay
//! valid for the lifetime of the set (bones are never removed individually;
//! tearing down a chain drops the whole set).

use crate::{Bone, BoneId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arena owning the bones of one or more kinematic chains.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneSet {
    bones: Vec<Bone>,
}

impl BoneSet {
    /// Create an empty bone set.
    #[must_use]
    pub fn new() -> Self {
        Self { bones: Vec::new() }
    }

    /// Create an empty bone set with capacity for `n` bones.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            bones: Vec::with_capacity(n),
        }
    }

    /// Insert a bone, returning its handle.
    pub fn insert(&mut self, bone: Bone) -> BoneId {
        let id = BoneId::new(self.bones.len() as u64);
        self.bones.push(bone);
        id
    }

    /// Get a bone by handle.
    #[must_use]
    pub fn get(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(usize::try_from(id.raw()).ok()?)
    }

    /// Get a mutable bone by handle.
    #[must_use]
    pub fn get_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(usize::try_from(id.raw()).ok()?)
    }

    /// Number of bones in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Iterate over all bones with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .map(|(i, bone)| (BoneId::new(i as u64), bone))
    }
}
