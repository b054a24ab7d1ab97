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
//! Partitioned dense storage
//!
//! A [`PartitionedStore`] shards one component into independent
//! [`DenseStore`]s selected by a [`PartitionKey`], typically the id of the
//! map or region an entity belongs to. The [`PartitionKey::GLOBAL`]
//! partition always exists; other partitions appear on their first `add`.
//!
//! Keyed operations touch exactly one partition. Operations addressed to
//! the global key act on whichever partition holds the entity.

use crate::ecs::component::{AnyStorage, ComponentStorage};
use crate::ecs::dense::{DenseStore, StoreConfig};
use crate::ecs::value::Packed;
use crate::ecs::Entity;
use crate::error::{EcsError, EcsResult};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Key selecting one partition of a [`PartitionedStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey(i64);

impl PartitionKey {
    /// The default, unscoped partition
    pub const GLOBAL: PartitionKey = PartitionKey(-1);

    /// Create a key from a raw value
    pub fn new(key: i64) -> Self {
        PartitionKey(key)
    }

    /// Get the raw key
    pub fn raw(&self) -> i64 {
        self.0
    }

    /// Check if this is the global key
    pub fn is_global(&self) -> bool {
        *self == Self::GLOBAL
    }
}

impl From<Entity> for PartitionKey {
    fn from(entity: Entity) -> Self {
        PartitionKey(entity.raw() as i64)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            write!(f, "global")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Dense stores sharded by [`PartitionKey`]
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::{Entity, Layout, PartitionKey, PartitionedStore, StoreConfig};
///
/// let config = StoreConfig::new(Layout::fields(["value"])).with_bytes_per_element(2);
/// let mut moisture = PartitionedStore::<[f64; 1]>::new(config).unwrap();
/// let map = PartitionKey::new(7);
///
/// moisture.add_to(Entity::new(1), [300.0], map).unwrap();
/// assert_eq!(moisture.get(Entity::new(1)), Some([300.0]));
/// assert!(!moisture.has_in(Entity::new(1), PartitionKey::new(8)));
/// ```
#[derive(Debug, Clone)]
pub struct PartitionedStore<T> {
    partitions: BTreeMap<PartitionKey, DenseStore<T>>,
    template: StoreConfig,
}

impl<T: Packed> PartitionedStore<T> {
    /// Create a store holding only the global partition
    ///
    /// The template is validated immediately and reused for every partition.
    pub fn new(template: StoreConfig) -> EcsResult<Self> {
        Self::with_initial_partition(template, PartitionKey::GLOBAL)
    }

    /// Create a store whose first partition uses `key`
    ///
    /// The global partition is still created so that global-key writes have
    /// somewhere to land.
    pub fn with_initial_partition(template: StoreConfig, key: PartitionKey) -> EcsResult<Self> {
        let mut partitions = BTreeMap::new();
        partitions.insert(PartitionKey::GLOBAL, DenseStore::with_config(&template)?);
        if !key.is_global() {
            partitions.insert(key, DenseStore::with_config(&template)?);
        }
        Ok(PartitionedStore { partitions, template })
    }

    /// Template used for new partitions
    pub fn template(&self) -> &StoreConfig {
        &self.template
    }

    /// Number of partitions, including the global one
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Keys of every partition in ascending order
    pub fn partition_keys(&self) -> impl Iterator<Item = PartitionKey> + '_ {
        self.partitions.keys().copied()
    }

    /// Direct access to one partition
    pub fn partition(&self, key: PartitionKey) -> Option<&DenseStore<T>> {
        self.partitions.get(&key)
    }

    /// Direct mutable access to one partition
    pub fn partition_mut(&mut self, key: PartitionKey) -> Option<&mut DenseStore<T>> {
        self.partitions.get_mut(&key)
    }

    fn existing(&self, key: PartitionKey) -> EcsResult<&DenseStore<T>> {
        self.partitions.get(&key).ok_or(EcsError::UnknownPartition(key))
    }

    fn existing_mut(&mut self, key: PartitionKey) -> EcsResult<&mut DenseStore<T>> {
        self.partitions
            .get_mut(&key)
            .ok_or(EcsError::UnknownPartition(key))
    }

    fn holder_of(&self, entity: Entity) -> Option<PartitionKey> {
        self.partitions
            .iter()
            .find(|(_, store)| store.has(entity))
            .map(|(key, _)| *key)
    }

    /// Add a value to a partition, creating the partition if unseen
    pub fn add_to(&mut self, entity: Entity, value: T, key: PartitionKey) -> EcsResult<()> {
        if !self.partitions.contains_key(&key) {
            log::debug!("Creating partition {}", key);
            let store = DenseStore::with_config(&self.template)?;
            self.partitions.insert(key, store);
        }
        self.existing_mut(key)?.add(entity, value)
    }

    /// Set a value in an existing partition
    ///
    /// With the global key, the partition already holding the entity is
    /// updated; an unheld entity lands in the global partition.
    pub fn set_in(&mut self, entity: Entity, value: T, key: PartitionKey) -> EcsResult<()> {
        let key = if key.is_global() {
            self.holder_of(entity).unwrap_or(PartitionKey::GLOBAL)
        } else {
            key
        };
        self.existing_mut(key)?.set(entity, value)
    }

    /// Get a value from one partition, or from any partition for the global key
    ///
    /// Absent entities yield `Ok(None)`; only a missing keyed partition fails.
    pub fn get_in(&self, entity: Entity, key: PartitionKey) -> EcsResult<Option<T>> {
        if key.is_global() {
            return Ok(self.get(entity));
        }
        Ok(self.existing(key)?.get(entity))
    }

    /// Get a value from whichever partition holds it
    pub fn get(&self, entity: Entity) -> Option<T> {
        self.holder_of(entity)
            .and_then(|key| self.partitions.get(&key))
            .and_then(|store| store.get(entity))
    }

    /// Remove a value from one partition, or from its holder for the global key
    pub fn remove_from(&mut self, entity: Entity, key: PartitionKey) -> EcsResult<()> {
        if key.is_global() {
            let holder = self.holder_of(entity).ok_or_else(|| EcsError::EntityNotFound {
                entity,
                scope: "any partition".to_string(),
            })?;
            return self.existing_mut(holder)?.remove(entity);
        }

        let store = self.existing_mut(key)?;
        if !store.has(entity) {
            return Err(EcsError::EntityNotFound {
                entity,
                scope: format!("partition {}", key),
            });
        }
        store.remove(entity)
    }

    /// Remove a value from every partition that holds it
    ///
    /// Returns the number of partitions the entity was removed from.
    pub fn remove_everywhere(&mut self, entity: Entity) -> EcsResult<usize> {
        let mut removed = 0;
        for store in self.partitions.values_mut() {
            if store.has(entity) {
                store.remove(entity)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Check one partition, or every partition for the global key
    pub fn has_in(&self, entity: Entity, key: PartitionKey) -> bool {
        if key.is_global() {
            return self.holder_of(entity).is_some();
        }
        self.partitions
            .get(&key)
            .map_or(false, |store| store.has(entity))
    }

    /// Visit every partition's slots as `(entity, value, slot)`
    ///
    /// Partitions are visited in ascending key order, slots in slot order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Entity, T, usize),
    {
        for store in self.partitions.values() {
            store.for_each(&mut f);
        }
    }

    /// Visit the slots of exactly one partition
    pub fn for_each_partition<F>(&self, key: PartitionKey, f: F) -> EcsResult<()>
    where
        F: FnMut(Entity, T, usize),
    {
        self.existing(key)?.for_each(f);
        Ok(())
    }
}

impl<T: Packed> ComponentStorage for PartitionedStore<T> {
    type Value = T;

    fn add(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        self.add_to(entity, value, PartitionKey::GLOBAL)
    }

    fn set(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        self.set_in(entity, value, PartitionKey::GLOBAL)
    }

    fn remove(&mut self, entity: Entity) -> EcsResult<()> {
        self.remove_from(entity, PartitionKey::GLOBAL)
    }

    fn has(&self, entity: Entity) -> bool {
        self.has_in(entity, PartitionKey::GLOBAL)
    }

    fn len(&self) -> usize {
        self.partitions.values().map(|store| store.len()).sum()
    }

    fn clear(&mut self) {
        for store in self.partitions.values_mut() {
            store.clear();
        }
    }
}

impl<T: Packed + 'static> AnyStorage for PartitionedStore<T> {
    fn store_name(&self) -> &'static str {
        "PartitionedStore"
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        match self.remove_everywhere(entity)? {
            0 => Err(EcsError::EntityNotFound {
                entity,
                scope: "any partition".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn entity_count(&self) -> usize {
        self.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
