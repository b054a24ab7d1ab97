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
//! System contract
//!
//! Systems hold only their parameters. Stores are looked up through the
//! [`World`] on every call, so one system value can drive several worlds.

use crate::ecs::World;
use crate::error::EcsResult;

/// Logic run once per frame against a world
pub trait System {
    /// Advance the world by `dt` time units
    fn update(&mut self, world: &mut World, dt: f64) -> EcsResult<()>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
