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
//! Error types for store, world and system operations
//!
//! Every hard failure is local to the single operation that raised it.
//! A failed operation leaves the store or world exactly as it found it.

use crate::ecs::{Entity, PartitionKey};
use thiserror::Error;

/// Errors raised by ECS operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EcsError {
    /// The entity already has a value in this store
    #[error("{0} already exists in this store")]
    DuplicateEntity(Entity),

    /// The entity has no value in this store
    #[error("{0} does not exist in this store")]
    UnknownEntity(Entity),

    /// The entity is not present in any partition searched
    #[error("{entity} does not exist in {scope}")]
    EntityNotFound {
        /// The entity that was looked up
        entity: Entity,
        /// Human readable description of what was searched
        scope: String,
    },

    /// A component with this name is already registered
    #[error("component '{0}' already registered")]
    DuplicateComponent(String),

    /// No component is registered under this name
    #[error("component '{0}' not registered")]
    UnknownComponent(String),

    /// The registered store is not of the requested kind
    #[error("component '{name}' is not a {expected}")]
    ComponentTypeMismatch {
        /// Registered component name
        name: String,
        /// Store kind the caller asked for
        expected: String,
    },

    /// The partition key has never been populated
    #[error("partition {0} does not exist")]
    UnknownPartition(PartitionKey),

    /// Flattened value length does not match the store dimensionality
    #[error("data length {actual} does not match dimensionality {expected}")]
    ShapeMismatch {
        /// Store dimensionality
        expected: usize,
        /// Number of scalars the value flattened to
        actual: usize,
    },

    /// The value contains a nested composite that cannot be flattened
    #[error("field '{field}' contains a nested value, which is not supported")]
    UnsupportedShape {
        /// Offending field name (or cell index for lists)
        field: String,
    },

    /// A field declared by the store layout is missing from the value
    #[error("value is missing field '{field}'")]
    MissingField {
        /// Layout field that was not supplied
        field: String,
    },

    /// Dense stores need room for at least one entity
    #[error("initial capacity must be greater than 0")]
    InvalidCapacity,

    /// Element widths other than 1, 2, 4 or 8 bytes
    #[error("invalid bytes per element {0}, must be 1, 2, 4, or 8")]
    InvalidElementWidth(usize),
}

/// Result alias used throughout the crate
pub type EcsResult<T> = Result<T, EcsError>;
