//! Id-addressed group storage.
//!
//! "Merge A into B" is a state transition on the arena, never a pointer
//! rewrite. Tombstoned groups stay resident for audit.

use taxo_core::errors::InputError;
use taxo_core::types::collections::FxHashMap;
use taxo_core::types::GroupId;

use super::group::{EquipmentType, SeedGroup};

/// Arena of equipment-type groups, addressed by stable id.
#[derive(Debug, Default)]
pub struct GroupArena {
    groups: FxHashMap<GroupId, EquipmentType>,
}

impl GroupArena {
    /// Build the arena from seed records.
    ///
    /// Fatal input validation happens here, before any processing:
    /// an empty seed collection aborts the run (`EmptyUniverse`) and
    /// duplicate ids are rejected (`DuplicateGroupId`).
    pub fn from_seeds(seeds: Vec<SeedGroup>) -> Result<Self, InputError> {
        if seeds.is_empty() {
            return Err(InputError::EmptyUniverse);
        }
        let mut groups = FxHashMap::default();
        for seed in seeds {
            let id = seed.id;
            if groups.insert(id, EquipmentType::from_seed(seed)).is_some() {
                return Err(InputError::DuplicateGroupId { id });
            }
        }
        Ok(Self { groups })
    }

    pub fn get(&self, id: GroupId) -> Option<&EquipmentType> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut EquipmentType> {
        self.groups.get_mut(&id)
    }

    /// Total number of groups, tombstoned included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of live (not merged-away) groups.
    pub fn live_count(&self) -> usize {
        self.groups.values().filter(|g| !g.is_merged_away).count()
    }

    pub fn is_live(&self, id: GroupId) -> bool {
        self.groups.get(&id).is_some_and(|g| !g.is_merged_away)
    }

    /// Live group ids in ascending order. Every stage iterates through
    /// this so results never depend on hash-map ordering.
    pub fn live_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self
            .groups
            .values()
            .filter(|g| !g.is_merged_away)
            .map(|g| g.id)
            .collect();
        ids.sort();
        ids
    }

    /// All group ids in ascending order, tombstoned included.
    pub fn all_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Mark a group merged-away. Clears any parent reference so no
    /// tombstoned group is ever the source of a live edge.
    pub fn tombstone(&mut self, id: GroupId) {
        if let Some(group) = self.groups.get_mut(&id) {
            group.is_merged_away = true;
            group.parent = None;
            group.parent_similarity = None;
        }
    }
}
