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
//! Gameplay components
//!
//! Planar kinematics components (position, velocity, acceleration) stored
//! densely with 4-byte float elements, and the per-map soil grids
//! (moisture, fertility) stored as one flat 16-bit buffer per map entity.

use crate::ecs::component::Component;
use crate::ecs::dense::{DenseStore, StoreConfig};
use crate::ecs::value::{Layout, Packed};
use crate::error::EcsResult;

/// Default entity capacity for kinematics stores
pub const KINEMATICS_CAPACITY: usize = 255;

/// Element width of kinematics stores
pub const KINEMATICS_BYTES: usize = 4;

/// Element width of soil grids; values span 0..=65535
pub const SOIL_BYTES: usize = 2;

/// Registered name of the moisture grid
pub const MOISTURE_COMPONENT: &str = "MoistureComponent";

/// Registered name of the fertility grid
pub const FERTILITY_COMPONENT: &str = "FertilityComponent";

macro_rules! planar_component {
    ($(#[$meta:meta])* $name:ident, $registered:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            /// Horizontal component
            pub x: f64,
            /// Vertical component
            pub y: f64,
        }

        impl $name {
            /// Create a new value
            pub fn new(x: f64, y: f64) -> Self {
                $name { x, y }
            }

            /// Zero value
            pub fn zero() -> Self {
                $name::new(0.0, 0.0)
            }

            /// Check if both components are finite
            pub fn is_valid(&self) -> bool {
                self.x.is_finite() && self.y.is_finite()
            }
        }

        impl Packed for $name {
            fn pack(&self, _layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()> {
                out.push(self.x);
                out.push(self.y);
                Ok(())
            }

            fn unpack(_layout: &Layout, values: &[f64]) -> Self {
                $name::new(
                    values.first().copied().unwrap_or_default(),
                    values.get(1).copied().unwrap_or_default(),
                )
            }
        }

        impl Component for $name {
            const NAME: &'static str = $registered;
            const FIELDS: &'static [&'static str] = &["x", "y"];
        }
    };
}

planar_component!(
    /// 2D position in map units
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_ecs::ecs::components::Position;
    ///
    /// let pos = Position::new(1.0, 2.0);
    /// assert_eq!(pos.x, 1.0);
    /// assert!(pos.is_valid());
    /// ```
    Position,
    "PositionComponent"
);

planar_component!(
    /// 2D velocity in map units per time unit
    Velocity,
    "Velocity"
);

planar_component!(
    /// 2D acceleration in map units per time unit squared
    Acceleration,
    "Acceleration"
);

/// Dense store for a planar component with the default capacity and width
pub fn kinematics_store<T: Component>() -> EcsResult<DenseStore<T>> {
    DenseStore::for_component(KINEMATICS_CAPACITY, KINEMATICS_BYTES)
}

/// Template for a soil grid store of `width * height` plots per map
pub fn soil_grid_config(width: usize, height: usize, maps: usize) -> StoreConfig {
    StoreConfig::new(Layout::grid(width, height))
        .with_capacity(maps.max(1))
        .with_bytes_per_element(SOIL_BYTES)
}

/// Dense store holding one soil grid per map entity
pub fn soil_grid_store(
    width: usize,
    height: usize,
    maps: usize,
) -> EcsResult<DenseStore<Vec<f64>>> {
    DenseStore::with_config(&soil_grid_config(width, height, maps))
}
