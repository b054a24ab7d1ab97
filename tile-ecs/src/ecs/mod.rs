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
//! Entity Component System (ECS) core implementation
//!
//! This module provides:
//! - Entity id allocation with recycling
//! - Component storage (hashed, packed numeric, partitioned)
//! - The world registry and system execution

mod entity;
mod value;
mod component;
mod dense;
mod partitioned;
mod system;
mod world;
pub mod components;

pub use entity::{Entity, EntityAllocator, LiveSet};
pub use value::{FieldValue, Layout, Packed, Record};
pub use component::{AnyStorage, Component, ComponentStorage, SparseStore};
pub use dense::{DenseSet, DenseStore, ElementKind, NumericBuffer, StoreConfig};
pub use partitioned::{PartitionKey, PartitionedStore};
pub use system::System;
pub use world::World;
