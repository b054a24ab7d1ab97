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
//! Component storage contracts
//!
//! Three storage strategies share one contract:
//!
//! - [`SparseStore`]: hashed, one arbitrary value per entity
//! - [`DenseStore`](crate::ecs::DenseStore): packed numeric sparse-set
//! - [`PartitionedStore`](crate::ecs::PartitionedStore): dense stores sharded by key
//!
//! [`ComponentStorage`] is the typed side of the contract used by callers
//! that know the value type. [`AnyStorage`] is the erased side the
//! [`World`](crate::ecs::World) registry holds; it exposes capabilities
//! (eager initialization, dense access) instead of concrete types.

use crate::ecs::value::{Layout, Packed};
use crate::ecs::dense::DenseSet;
use crate::ecs::Entity;
use crate::error::{EcsError, EcsResult};
use std::any::Any;
use std::collections::HashMap;

/// A component type with a fixed, named scalar layout
///
/// Components are plain data. Keep them small: every field becomes one
/// scalar in a dense store.
pub trait Component: Packed + 'static {
    /// Name the component is registered under by convention
    const NAME: &'static str;

    /// Ordered field names
    const FIELDS: &'static [&'static str];

    /// Dense layout built from [`Component::FIELDS`]
    fn layout() -> Layout {
        Layout::fields(Self::FIELDS.iter().copied())
    }
}

/// Typed storage interface shared by every strategy
///
/// `get` and iteration are deliberately not part of this trait: a sparse
/// store hands out references and fails on absence, a dense store rebuilds
/// values and returns `None`.
pub trait ComponentStorage {
    /// The value type this storage manages
    type Value;

    /// Insert a value for an entity that has none
    fn add(&mut self, entity: Entity, value: Self::Value) -> EcsResult<()>;

    /// Replace an entity's value
    fn set(&mut self, entity: Entity, value: Self::Value) -> EcsResult<()>;

    /// Remove an entity's value
    fn remove(&mut self, entity: Entity) -> EcsResult<()>;

    /// Check if an entity has a value
    fn has(&self, entity: Entity) -> bool;

    /// Number of entities with a value
    fn len(&self) -> usize;

    /// Check if no entity has a value
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every value
    fn clear(&mut self);
}

/// Type-erased store contract held by the world registry
pub trait AnyStorage: Any {
    /// Short name of the storage strategy, for diagnostics
    fn store_name(&self) -> &'static str;

    /// Check if an entity has a value
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Remove an entity's value
    fn remove_entity(&mut self, entity: Entity) -> EcsResult<()>;

    /// Number of entities with a value
    fn entity_count(&self) -> usize;

    /// Whether new entities get a placeholder value on creation
    fn requires_eager_init(&self) -> bool {
        false
    }

    /// Insert the placeholder value for a freshly created entity
    fn seed_entity(&mut self, _entity: Entity) -> EcsResult<()> {
        Ok(())
    }

    /// Packed numeric view, for stores that keep one
    fn as_dense(&self) -> Option<&DenseSet> {
        None
    }

    /// Mutable packed numeric view, for stores that keep one
    fn as_dense_mut(&mut self) -> Option<&mut DenseSet> {
        None
    }

    /// Upcast for typed access
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// HashMap-based component storage
///
/// Holds one value of any type per entity. Every entity-addressed operation
/// is strict: `add` fails on a present entity, `set`/`get`/`remove` fail on
/// an absent one.
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::{ComponentStorage, Entity, SparseStore};
///
/// let mut names = SparseStore::<String>::new();
/// let entity = Entity::new(0);
///
/// names.add(entity, "plot".to_string()).unwrap();
/// assert_eq!(names.get(entity).unwrap(), "plot");
/// assert!(names.get(Entity::new(1)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SparseStore<T> {
    components: HashMap<Entity, T>,
}

impl<T> SparseStore<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        SparseStore {
            components: HashMap::new(),
        }
    }

    /// Get an entity's value
    pub fn get(&self, entity: Entity) -> EcsResult<&T> {
        self.components
            .get(&entity)
            .ok_or(EcsError::UnknownEntity(entity))
    }

    /// Get an entity's value mutably
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.components
            .get_mut(&entity)
            .ok_or(EcsError::UnknownEntity(entity))
    }

    /// Remove an entity's value and return it
    pub fn take(&mut self, entity: Entity) -> EcsResult<T> {
        self.components
            .remove(&entity)
            .ok_or(EcsError::UnknownEntity(entity))
    }

    /// Visit every `(entity, value, index)`; order is unspecified
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Entity, &T, usize),
    {
        for (index, (entity, value)) in self.components.iter().enumerate() {
            f(*entity, value, index);
        }
    }

    /// Iterate entities with a value; order is unspecified
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.components.keys().copied()
    }
}

impl<T> Default for SparseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStorage for SparseStore<T> {
    type Value = T;

    fn add(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        if self.components.contains_key(&entity) {
            return Err(EcsError::DuplicateEntity(entity));
        }
        self.components.insert(entity, value);
        Ok(())
    }

    fn set(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let slot = self.get_mut(entity)?;
        *slot = value;
        Ok(())
    }

    fn remove(&mut self, entity: Entity) -> EcsResult<()> {
        self.take(entity).map(|_| ())
    }

    fn has(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        self.components.clear();
    }
}

impl<T: Default + 'static> AnyStorage for SparseStore<T> {
    fn store_name(&self) -> &'static str {
        "SparseStore"
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.remove(entity)
    }

    fn entity_count(&self) -> usize {
        self.len()
    }

    fn requires_eager_init(&self) -> bool {
        true
    }

    fn seed_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.components.entry(entity).or_default();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
