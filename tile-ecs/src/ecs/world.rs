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
//! World management
//!
//! The World is the central container: it owns the entity allocator, the
//! named component stores and the ordered system list. The live entity set
//! belongs to the caller and is passed in explicitly.

use crate::ecs::{AnyStorage, Entity, EntityAllocator, LiveSet, System};
use crate::error::{EcsError, EcsResult};
use std::collections::HashMap;

/// The main ECS world container
pub struct World {
    allocator: EntityAllocator,
    components: HashMap<String, Box<dyn AnyStorage>>,
    systems: Vec<Box<dyn System>>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            allocator: EntityAllocator::new(),
            components: HashMap::new(),
            systems: Vec::new(),
        }
    }

    /// Bind a store to a component name
    ///
    /// A name can only be bound once; the existing store is kept on failure.
    pub fn register_component<S: AnyStorage>(&mut self, name: &str, store: S) -> EcsResult<()> {
        if self.components.contains_key(name) {
            return Err(EcsError::DuplicateComponent(name.to_string()));
        }
        log::debug!("registered component '{}' ({})", name, store.store_name());
        self.components.insert(name.to_string(), Box::new(store));
        Ok(())
    }

    /// Check if a component name is bound
    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Look up a store by name
    pub fn component(&self, name: &str) -> EcsResult<&dyn AnyStorage> {
        self.components
            .get(name)
            .map(|store| store.as_ref())
            .ok_or_else(|| EcsError::UnknownComponent(name.to_string()))
    }

    /// Look up a store by name, mutably
    pub fn component_mut(&mut self, name: &str) -> EcsResult<&mut dyn AnyStorage> {
        self.components
            .get_mut(name)
            .map(|store| store.as_mut() as &mut dyn AnyStorage)
            .ok_or_else(|| EcsError::UnknownComponent(name.to_string()))
    }

    /// Look up a store by name and concrete type
    ///
    /// # Example
    ///
    /// ```
    /// use tile_ecs::ecs::{ComponentStorage, Entity, SparseStore, World};
    ///
    /// let mut world = World::new();
    /// world.register_component("Label", SparseStore::<String>::new()).unwrap();
    ///
    /// let labels = world.component_as_mut::<SparseStore<String>>("Label").unwrap();
    /// labels.add(Entity::new(0), "well".to_string()).unwrap();
    ///
    /// assert!(world.component_as::<SparseStore<u32>>("Label").is_err());
    /// ```
    pub fn component_as<S: AnyStorage>(&self, name: &str) -> EcsResult<&S> {
        self.component(name)?
            .as_any()
            .downcast_ref::<S>()
            .ok_or_else(|| type_mismatch::<S>(name))
    }

    /// Look up a store by name and concrete type, mutably
    pub fn component_as_mut<S: AnyStorage>(&mut self, name: &str) -> EcsResult<&mut S> {
        self.component_mut(name)?
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or_else(|| type_mismatch::<S>(name))
    }

    /// Names of every registered component, sorted
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Allocate an entity and seed it into stores that need eager values
    pub fn create_entity(&mut self, live: &mut LiveSet) -> EcsResult<Entity> {
        let entity = self.allocator.allocate(live);
        for (name, store) in self.components.iter_mut() {
            if store.requires_eager_init() {
                store.seed_entity(entity)?;
                log::trace!("seeded {} into '{}'", entity, name);
            }
        }
        log::debug!("created {}", entity);
        Ok(entity)
    }

    /// Strip an entity from every store and release its id
    ///
    /// Removal is best-effort: a failing store is logged and skipped.
    pub fn destroy_entity(&mut self, live: &mut LiveSet, entity: Entity) {
        for (name, store) in self.components.iter_mut() {
            if !store.contains_entity(entity) {
                continue;
            }
            if let Err(err) = store.remove_entity(entity) {
                log::warn!("failed to remove {} from '{}': {}", entity, name, err);
            }
        }
        self.allocator.release(live, entity);
        log::debug!("destroyed {}", entity);
    }

    /// Append a system; systems run in registration order
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Run every system once
    ///
    /// The first failing system stops the frame and its error is returned.
    pub fn update(&mut self, dt: f64) -> EcsResult<()> {
        let mut systems = std::mem::take(&mut self.systems);
        let mut result = Ok(());
        for system in systems.iter_mut() {
            if let Err(err) = system.update(self, dt) {
                log::warn!("system '{}' failed: {}", system.name(), err);
                result = Err(err);
                break;
            }
        }
        // Systems added during the frame run from the next frame on
        systems.append(&mut self.systems);
        self.systems = systems;
        result
    }

    /// Entity ids waiting for reuse
    pub fn free_count(&self) -> usize {
        self.allocator.free_count()
    }
}

fn type_mismatch<S>(name: &str) -> EcsError {
    EcsError::ComponentTypeMismatch {
        name: name.to_string(),
        expected: std::any::type_name::<S>().to_string(),
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentStorage, DenseStore, Layout, SparseStore};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Owner(u32);

    fn grid_store() -> DenseStore<Vec<f64>> {
        DenseStore::new(4, 8, Layout::cells(3)).unwrap()
    }

    #[test]
    fn test_world_entity_lifecycle() {
        let mut world = World::new();
        let mut live = LiveSet::new();

        let e1 = world.create_entity(&mut live).unwrap();
        let e2 = world.create_entity(&mut live).unwrap();
        assert_eq!((e1.raw(), e2.raw()), (0, 1));

        world.destroy_entity(&mut live, e1);
        assert!(!live.contains(&e1));
        assert!(live.contains(&e2));
        assert_eq!(world.free_count(), 1);
        assert_eq!(world.create_entity(&mut live).unwrap(), e1);
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let mut world = World::new();
        world.register_component("Grid", grid_store()).unwrap();
        assert_eq!(
            world.register_component("Grid", SparseStore::<Owner>::new()),
            Err(EcsError::DuplicateComponent("Grid".to_string()))
        );
        assert_eq!(world.component("Grid").unwrap().store_name(), "DenseStore");
    }

    #[test]
    fn test_unknown_and_mismatched_lookup() {
        let mut world = World::new();
        world.register_component("Owner", SparseStore::<Owner>::new()).unwrap();

        assert!(matches!(
            world.component("Nope"),
            Err(EcsError::UnknownComponent(_))
        ));
        assert!(matches!(
            world.component_as::<DenseStore<Vec<f64>>>("Owner"),
            Err(EcsError::ComponentTypeMismatch { .. })
        ));
        assert!(world.component_as::<SparseStore<Owner>>("Owner").is_ok());
    }

    #[test]
    fn test_eager_init_only_for_flagged_stores() {
        let mut world = World::new();
        let mut live = LiveSet::new();
        world.register_component("Owner", SparseStore::<Owner>::new()).unwrap();
        world.register_component("Grid", grid_store()).unwrap();

        let e = world.create_entity(&mut live).unwrap();
        assert!(world.component("Owner").unwrap().contains_entity(e));
        assert!(!world.component("Grid").unwrap().contains_entity(e));
    }

    #[test]
    fn test_destroy_removes_from_all_stores() {
        let mut world = World::new();
        let mut live = LiveSet::new();
        world.register_component("Owner", SparseStore::<Owner>::new()).unwrap();
        world.register_component("Grid", grid_store()).unwrap();

        let e = world.create_entity(&mut live).unwrap();
        world
            .component_as_mut::<DenseStore<Vec<f64>>>("Grid")
            .unwrap()
            .add(e, vec![1.0, 2.0, 3.0])
            .unwrap();

        world.destroy_entity(&mut live, e);
        for name in world.component_names() {
            assert!(!world.component(name).unwrap().contains_entity(e));
        }
    }

    struct Tick {
        label: &'static str,
        fail: bool,
    }

    impl System for Tick {
        fn update(&mut self, world: &mut World, _dt: f64) -> EcsResult<()> {
            if self.fail {
                return Err(EcsError::UnknownComponent(self.label.to_string()));
            }
            let log = world.component_as_mut::<SparseStore<Vec<&'static str>>>("Log")?;
            log.get_mut(Entity::new(0))?.push(self.label);
            Ok(())
        }
    }

    fn log_world() -> World {
        let mut world = World::new();
        let mut store = SparseStore::<Vec<&'static str>>::new();
        store.add(Entity::new(0), Vec::new()).unwrap();
        world.register_component("Log", store).unwrap();
        world
    }

    fn log_of(world: &World) -> Vec<&'static str> {
        world
            .component_as::<SparseStore<Vec<&'static str>>>("Log")
            .unwrap()
            .get(Entity::new(0))
            .unwrap()
            .clone()
    }

    #[test]
    fn test_update_runs_in_order() {
        let mut world = log_world();
        world.add_system(Tick { label: "a", fail: false });
        world.add_system(Tick { label: "b", fail: false });

        world.update(1.0).unwrap();
        world.update(1.0).unwrap();
        assert_eq!(log_of(&world), vec!["a", "b", "a", "b"]);
        assert_eq!(world.system_count(), 2);
    }

    #[test]
    fn test_update_error_aborts_frame_and_keeps_systems() {
        let mut world = log_world();
        world.add_system(Tick { label: "a", fail: false });
        world.add_system(Tick { label: "boom", fail: true });
        world.add_system(Tick { label: "c", fail: false });

        assert_eq!(
            world.update(1.0),
            Err(EcsError::UnknownComponent("boom".to_string()))
        );
        assert_eq!(log_of(&world), vec!["a"]);
        assert_eq!(world.system_count(), 3);
    }
}
