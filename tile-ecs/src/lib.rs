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
//! # Tile ECS
//!
//! The entity-component-system core of a tile-map editor, with the soil
//! simulation that runs on top of it.
//!
//! ## Features
//!
//! - **Entity Allocation**: Dense integer ids, recycled after release
//! - **Component Stores**: Hashed, packed numeric (sparse-set) and partitioned
//! - **Quantized Buffers**: 1, 2, 4 or 8 bytes per scalar
//! - **Diffusion**: Moisture and fertility spread across per-map grids
//! - **Movement**: Planar position and velocity integration
//! - **Parallelization**: Optional Rayon integration for diffusion steps
//!
//! ## Example
//!
//! ```rust
//! use tile_ecs::ecs::{components, ComponentStorage, LiveSet, World};
//! use tile_ecs::random::{random_grid, SeededRng};
//! use tile_ecs::simulation::DiffusionSystem;
//!
//! let mut world = World::new();
//! let mut live = LiveSet::new();
//! let map = world.create_entity(&mut live).unwrap();
//!
//! let mut rng = SeededRng::new(12345);
//! let mut moisture = components::soil_grid_store(8, 8, 1).unwrap();
//! moisture.add(map, random_grid(8, 8, 65535.0, &mut rng)).unwrap();
//! world.register_component(components::MOISTURE_COMPONENT, moisture).unwrap();
//!
//! world.add_system(DiffusionSystem::moisture(8));
//! world.update(1.0).unwrap();
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Error types
pub mod error;

/// Simulation systems
pub mod simulation;

/// Seeded random generation
pub mod random;

/// Spatial bucketing
pub mod spatial;

pub use ecs::{Entity, World};
pub use error::{EcsError, EcsResult};
