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
//! Grid diffusion
//!
//! Each map entity owns one flat, row-major grid in a dense store. A step
//! relaxes every cell toward the mean of its in-bounds 4-neighbours:
//!
//! ```text
//! next[i] = round(A[i] + rate * (mean(neighbours(i)) - A[i]))
//! ```
//!
//! Every cell reads the pre-step snapshot; the grid is written back once.
//! A cell without neighbours (a 1x1 grid) keeps its value.

use crate::ecs::components::{FERTILITY_COMPONENT, MOISTURE_COMPONENT};
use crate::ecs::{Entity, System, World};
use crate::error::{EcsError, EcsResult};
use crate::simulation::{dense_view, dense_view_mut, is_active_timestep};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default relaxation rate
pub const DEFAULT_RATE: f64 = 0.1;

/// Which maps a diffusion step touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapTarget {
    /// Every map entity in the store
    #[default]
    All,
    /// A single map entity
    Map(Entity),
}

/// Diffusion parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionConfig {
    /// Relaxation rate in (0, 1]
    pub rate: f64,
    /// Grid width in cells
    pub width: usize,
    /// Log a warning when the targeted map has no grid
    pub warn_on_missing: bool,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        DiffusionConfig {
            rate: DEFAULT_RATE,
            width: 1,
            warn_on_missing: true,
        }
    }
}

impl DiffusionConfig {
    /// Default parameters for a grid of the given width
    pub fn new(width: usize) -> Self {
        DiffusionConfig {
            width,
            ..Default::default()
        }
    }

    /// Set the relaxation rate
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Enable or disable warnings for missing maps
    pub fn with_warn_on_missing(mut self, warn_on_missing: bool) -> Self {
        self.warn_on_missing = warn_on_missing;
        self
    }
}

/// Relaxes a per-map grid component toward its neighbour average
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::{components, ComponentStorage, Entity, World};
/// use tile_ecs::simulation::{DiffusionSystem, MapTarget};
///
/// let mut world = World::new();
/// let mut store = components::soil_grid_store(3, 1, 1).unwrap();
/// let map = Entity::new(0);
/// store.add(map, vec![0.0, 100.0, 0.0]).unwrap();
/// world.register_component(components::MOISTURE_COMPONENT, store).unwrap();
///
/// let diffusion = DiffusionSystem::moisture(3);
/// diffusion.step(&mut world, 1.0, MapTarget::All).unwrap();
///
/// let grid = diffusion.display_component_levels(&world, map).unwrap().unwrap();
/// assert_eq!(grid.values(), vec![10.0, 90.0, 10.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DiffusionSystem {
    component: String,
    config: DiffusionConfig,
    target: MapTarget,
}

impl DiffusionSystem {
    /// Create a diffusion system over the named grid component
    ///
    /// # Panics
    ///
    /// Panics if the width is zero or the rate is outside (0, 1]
    pub fn new(component: impl Into<String>, config: DiffusionConfig) -> Self {
        assert!(config.width > 0, "Grid width must be positive");
        assert!(
            config.rate > 0.0 && config.rate <= 1.0,
            "Diffusion rate must be in (0, 1]"
        );
        DiffusionSystem {
            component: component.into(),
            config,
            target: MapTarget::All,
        }
    }

    /// Moisture diffusion with the default rate
    pub fn moisture(width: usize) -> Self {
        Self::new(MOISTURE_COMPONENT, DiffusionConfig::new(width))
    }

    /// Fertility diffusion with the default rate
    pub fn fertility(width: usize) -> Self {
        Self::new(FERTILITY_COMPONENT, DiffusionConfig::new(width))
    }

    /// Restrict frame updates to the given maps
    pub fn with_target(mut self, target: MapTarget) -> Self {
        self.target = target;
        self
    }

    /// Name of the grid component
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Current parameters
    pub fn config(&self) -> &DiffusionConfig {
        &self.config
    }

    /// Maps touched by frame updates
    pub fn target(&self) -> MapTarget {
        self.target
    }

    /// Check parameters that are legal but unlikely to be intended
    pub fn validate(&self) -> Result<(), String> {
        // A 16-bit grid only moves when rate * gap reaches 0.5
        if self.config.rate < 0.005 {
            return Err(format!(
                "Warning: Rate {} is small enough that rounding may cancel every update. \
                Consider a rate of at least 0.005.",
                self.config.rate
            ));
        }
        if self.config.width > u16::MAX as usize {
            return Err(format!(
                "Warning: Grid width {} is unusually large for a tile map.",
                self.config.width
            ));
        }
        Ok(())
    }

    /// Run one diffusion step over the targeted maps
    ///
    /// Returns the number of grids updated. A missing map is not an error.
    pub fn step(&self, world: &mut World, dt: f64, target: MapTarget) -> EcsResult<usize> {
        if !is_active_timestep(dt) {
            return Ok(0);
        }

        let grids = dense_view_mut(world, &self.component)?;
        let cells = grids.dimensionality();
        let width = self.config.width;
        if cells % width != 0 {
            log::debug!(
                "'{}' grid of {} cells is not a multiple of width {}",
                self.component,
                cells,
                width
            );
            return Err(EcsError::ShapeMismatch {
                expected: (cells / width + 1) * width,
                actual: cells,
            });
        }
        let maps: Vec<Entity> = match target {
            MapTarget::All => grids.entities().collect(),
            MapTarget::Map(map) if grids.contains(map) => vec![map],
            MapTarget::Map(map) => {
                if self.config.warn_on_missing {
                    log::warn!("no '{}' grid for map {}", self.component, map);
                }
                return Ok(0);
            }
        };
        if maps.is_empty() {
            if self.config.warn_on_missing {
                log::warn!("no '{}' grids across any map", self.component);
            }
            return Ok(0);
        }

        let mut updated = 0;
        for map in maps {
            let Some(cells) = grids.read(map) else {
                continue;
            };
            let next = diffuse_cells(&cells, self.config.width, self.config.rate);
            grids.write(map, &next)?;
            log::trace!("diffused '{}' for map {}", self.component, map);
            updated += 1;
        }
        Ok(updated)
    }

    /// Snapshot a map's grid as positioned levels
    ///
    /// Returns `None` when the map has no grid.
    pub fn display_component_levels(
        &self,
        world: &World,
        map: Entity,
    ) -> EcsResult<Option<LevelGrid>> {
        let grids = dense_view(world, &self.component)?;
        Ok(grids
            .read(map)
            .map(|cells| LevelGrid::new(self.config.width, cells)))
    }
}

impl System for DiffusionSystem {
    fn update(&mut self, world: &mut World, dt: f64) -> EcsResult<()> {
        self.step(world, dt, self.target).map(|_| ())
    }

    fn name(&self) -> &str {
        "DiffusionSystem"
    }
}

/// One relaxation step of a row-major grid
///
/// # Panics
///
/// Panics if `width` is zero
pub fn diffuse_cells(cells: &[f64], width: usize, rate: f64) -> Vec<f64> {
    assert!(width > 0, "Grid width must be positive");

    #[cfg(feature = "parallel")]
    {
        (0..cells.len())
            .into_par_iter()
            .map(|i| relax_cell(cells, i, width, rate))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..cells.len())
            .map(|i| relax_cell(cells, i, width, rate))
            .collect()
    }
}

fn relax_cell(cells: &[f64], i: usize, width: usize, rate: f64) -> f64 {
    let len = cells.len();
    let current = cells[i];
    let mut total = 0.0;
    let mut count = 0u32;

    if i % width != 0 {
        total += cells[i - 1];
        count += 1;
    }
    if i % width != width - 1 && i + 1 < len {
        total += cells[i + 1];
        count += 1;
    }
    if i >= width {
        total += cells[i - width];
        count += 1;
    }
    if i + width < len {
        total += cells[i + width];
        count += 1;
    }

    if count == 0 {
        return current;
    }
    let average = total / f64::from(count);
    (current + rate * (average - current)).round()
}

/// A single positioned cell value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLevel {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Stored level
    pub value: f64,
}

impl fmt::Display for CellLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{x: {}, y: {} - {} }}", self.x, self.y, self.value)
    }
}

/// Row-major levels of one map's grid
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGrid {
    width: usize,
    cells: Vec<CellLevel>,
}

impl LevelGrid {
    fn new(width: usize, values: Vec<f64>) -> Self {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| CellLevel {
                x: i % width,
                y: i / width,
                value,
            })
            .collect();
        LevelGrid { width, cells }
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows, counting a partial last row
    pub fn height(&self) -> usize {
        (self.cells.len() + self.width - 1) / self.width
    }

    /// Level at a position
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width {
            return None;
        }
        self.cells.get(y * self.width + x).map(|cell| cell.value)
    }

    /// Every cell, row-major
    pub fn cells(&self) -> &[CellLevel] {
        &self.cells
    }

    /// Every level, row-major
    pub fn values(&self) -> Vec<f64> {
        self.cells.iter().map(|cell| cell.value).collect()
    }
}

impl fmt::Display for LevelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.width).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                write!(f, "{} ", cell)?;
            }
        }
        Ok(())
    }
}
