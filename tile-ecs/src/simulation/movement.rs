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
//! Planar movement
//!
//! Semi-implicit Euler over dense `x`, `y` stores:
//!
//! ```text
//! v(t + dt) = v(t) + a(t)*dt     (only with an acceleration store)
//! x(t + dt) = x(t) + v(t + dt)*dt
//! ```

use crate::ecs::components::{Position, Velocity};
use crate::ecs::{Component, DenseSet, Entity, System, World};
use crate::error::{EcsError, EcsResult};
use crate::simulation::{dense_view, dense_view_mut, is_active_timestep};

/// Store names and diagnostics for movement
#[derive(Debug, Clone, PartialEq)]
pub struct MovementConfig {
    /// Position store name
    pub position: String,
    /// Velocity store name
    pub velocity: String,
    /// Acceleration store name; `None` integrates velocity only
    pub acceleration: Option<String>,
    /// Log a warning for moving entities without a position
    pub warn_on_missing: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        MovementConfig {
            position: Position::NAME.to_string(),
            velocity: Velocity::NAME.to_string(),
            acceleration: None,
            warn_on_missing: false,
        }
    }
}

impl MovementConfig {
    /// Integrate velocity from the named acceleration store
    pub fn with_acceleration(mut self, name: impl Into<String>) -> Self {
        self.acceleration = Some(name.into());
        self
    }

    /// Enable or disable warnings for entities without a position
    pub fn with_warn_on_missing(mut self, warn_on_missing: bool) -> Self {
        self.warn_on_missing = warn_on_missing;
        self
    }
}

/// Moves entities by their velocity once per call
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::components::{kinematics_store, Position, Velocity};
/// use tile_ecs::ecs::{Component, ComponentStorage, DenseStore, Entity, World};
/// use tile_ecs::simulation::MovementSystem;
///
/// let mut world = World::new();
/// let e = Entity::new(0);
/// let mut positions = kinematics_store::<Position>().unwrap();
/// let mut velocities = kinematics_store::<Velocity>().unwrap();
/// positions.add(e, Position::new(1.0, 1.0)).unwrap();
/// velocities.add(e, Velocity::new(2.0, 0.0)).unwrap();
/// world.register_component(Position::NAME, positions).unwrap();
/// world.register_component(Velocity::NAME, velocities).unwrap();
///
/// MovementSystem::default().step(&mut world, 0.5).unwrap();
///
/// let positions = world.component_as::<DenseStore<Position>>(Position::NAME).unwrap();
/// assert_eq!(positions.get(e), Some(Position::new(2.0, 1.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    config: MovementConfig,
}

impl MovementSystem {
    /// Create a movement system over the configured stores
    pub fn new(config: MovementConfig) -> Self {
        MovementSystem { config }
    }

    /// Current configuration
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Advance every moving entity by `dt`
    ///
    /// Returns the number of positions written.
    pub fn step(&self, world: &mut World, dt: f64) -> EcsResult<usize> {
        if !is_active_timestep(dt) {
            return Ok(0);
        }

        let mut moving = read_vectors(world, &self.config.velocity)?;

        let mut accelerated = Vec::new();
        if let Some(name) = &self.config.acceleration {
            let accelerations = dense_view(world, name)?;
            check_planar(name, accelerations.dimensionality())?;
            for (entity, velocity) in moving.iter_mut() {
                let Some(a) = accelerations.read(*entity) else {
                    continue;
                };
                let next = [velocity[0] + a[0] * dt, velocity[1] + a[1] * dt];
                if !next.iter().all(|v| v.is_finite()) {
                    log::warn!("invalid velocity after update for {}", entity);
                    continue;
                }
                *velocity = next;
                accelerated.push((*entity, next));
            }
        }

        let positions = dense_view(world, &self.config.position)?;
        check_planar(&self.config.position, positions.dimensionality())?;
        let mut moved = Vec::new();
        for (entity, velocity) in moving {
            let Some(p) = positions.read(entity) else {
                if self.config.warn_on_missing {
                    log::warn!("{} has a velocity but no position", entity);
                } else {
                    log::trace!("skipping {} without position", entity);
                }
                continue;
            };
            let next = [p[0] + velocity[0] * dt, p[1] + velocity[1] * dt];
            if !next.iter().all(|v| v.is_finite()) {
                log::warn!("invalid position after update for {}", entity);
                continue;
            }
            moved.push((entity, next));
        }

        // Every store resolved; commit
        if !accelerated.is_empty() {
            let velocities = dense_view_mut(world, &self.config.velocity)?;
            for (entity, next) in accelerated {
                write_vector(velocities, entity, next)?;
            }
        }
        let positions = dense_view_mut(world, &self.config.position)?;
        for &(entity, next) in &moved {
            write_vector(positions, entity, next)?;
        }
        Ok(moved.len())
    }
}

impl System for MovementSystem {
    fn update(&mut self, world: &mut World, dt: f64) -> EcsResult<()> {
        self.step(world, dt).map(|_| ())
    }

    fn name(&self) -> &str {
        "MovementSystem"
    }
}

fn check_planar(name: &str, dimensionality: usize) -> EcsResult<()> {
    if dimensionality < 2 {
        log::debug!("store '{}' is not planar", name);
        return Err(EcsError::ShapeMismatch {
            expected: 2,
            actual: dimensionality,
        });
    }
    Ok(())
}

fn read_vectors(world: &World, name: &str) -> EcsResult<Vec<(Entity, [f64; 2])>> {
    let store = dense_view(world, name)?;
    check_planar(name, store.dimensionality())?;
    Ok(store
        .entities()
        .filter_map(|entity| store.read(entity).map(|v| (entity, [v[0], v[1]])))
        .collect())
}

fn write_vector(store: &mut DenseSet, entity: Entity, xy: [f64; 2]) -> EcsResult<()> {
    let mut values = store.read(entity).ok_or(EcsError::UnknownEntity(entity))?;
    values[0] = xy[0];
    values[1] = xy[1];
    store.write(entity, &values)
}
