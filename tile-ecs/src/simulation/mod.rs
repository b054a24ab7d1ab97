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
//! Simulation systems for the tile map
//!
//! - **Diffusion**: relaxes every cell of a per-map grid toward the average
//!   of its in-bounds neighbours (moisture, fertility)
//! - **Movement**: advances positions by velocity, optionally after
//!   applying acceleration
//!
//! Both systems reach their stores through the packed numeric view a
//! store exposes on the erased contract, so any dense store with a
//! compatible shape works regardless of its value type.
//!
//! # Timestep Guidelines
//!
//! - `dt <= 0` (or non-finite) leaves the world untouched
//! - Diffusion performs exactly one relaxation step per call; `dt` only
//!   gates whether the step happens

use crate::ecs::{DenseSet, World};
use crate::error::{EcsError, EcsResult};

mod diffusion;
mod movement;

pub use diffusion::{
    diffuse_cells, CellLevel, DiffusionConfig, DiffusionSystem, LevelGrid, MapTarget, DEFAULT_RATE,
};
pub use movement::{MovementConfig, MovementSystem};

/// Check that a timestep should advance the simulation
pub(crate) fn is_active_timestep(dt: f64) -> bool {
    dt > 0.0 && dt.is_finite()
}

/// Packed view of a registered store
pub(crate) fn dense_view<'w>(world: &'w World, name: &str) -> EcsResult<&'w DenseSet> {
    let store = world.component(name)?;
    let store_name = store.store_name();
    store.as_dense().ok_or_else(|| not_dense(name, store_name))
}

/// Mutable packed view of a registered store
pub(crate) fn dense_view_mut<'w>(world: &'w mut World, name: &str) -> EcsResult<&'w mut DenseSet> {
    let store = world.component_mut(name)?;
    let store_name = store.store_name();
    store.as_dense_mut().ok_or_else(|| not_dense(name, store_name))
}

fn not_dense(name: &str, store_name: &str) -> EcsError {
    EcsError::ComponentTypeMismatch {
        name: name.to_string(),
        expected: format!("dense store (found {})", store_name),
    }
}
