// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Entity management
//!
//! Entities are plain integer identifiers with no payload. Which ids are
//! currently alive is tracked by a [`LiveSet`] owned by the caller and shared
//! with the [`EntityAllocator`] on every call, so a single allocator can serve
//! several independent sets of entities.

use std::collections::HashSet;
use std::fmt;

/// Opaque entity identifier
///
/// Ids are dense low integers starting at 0; released ids are recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// Create an entity handle from a raw id
    pub fn new(id: u64) -> Self {
        Entity(id)
    }

    /// Get the raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Entity {
    fn from(id: u64) -> Self {
        Entity(id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Set of currently live entities
pub type LiveSet = HashSet<Entity>;

/// Issues and recycles entity ids against a [`LiveSet`]
#[derive(Debug, Default, Clone)]
pub struct EntityAllocator {
    recycled: Vec<Entity>,
}

impl EntityAllocator {
    /// Create an allocator with an empty free list
    pub fn new() -> Self {
        EntityAllocator { recycled: Vec::new() }
    }

    /// Allocate an id and insert it into `live`
    ///
    /// Recycled ids are preferred, most recently released first. Recycled ids
    /// that re-entered `live` by other means are discarded. With nothing to
    /// recycle the next id is `live.len()`, probing upward past any id that
    /// was inserted into `live` externally.
    pub fn allocate(&mut self, live: &mut LiveSet) -> Entity {
        while let Some(candidate) = self.recycled.pop() {
            if !live.contains(&candidate) {
                live.insert(candidate);
                return candidate;
            }
            log::trace!("Discarding recycled {} that is already live", candidate);
        }

        let mut id = live.len() as u64;
        while live.contains(&Entity(id)) {
            id += 1;
        }
        let entity = Entity(id);
        live.insert(entity);
        entity
    }

    /// Remove `entity` from `live` and mark its id for reuse
    ///
    /// Releasing an entity that is not live is a no-op.
    pub fn release(&mut self, live: &mut LiveSet, entity: Entity) {
        if live.remove(&entity) {
            self.recycled.push(entity);
        }
    }

    /// Number of ids waiting to be recycled
    pub fn free_count(&self) -> usize {
        self.recycled.len()
    }

    /// Forget every recycled id
    pub fn clear(&mut self) {
        self.recycled.clear();
    }
}
