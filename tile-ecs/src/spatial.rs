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
//! Uniform spatial bucketing
//!
//! Entities are filed under the square plot containing their position.
//! Region queries visit only the plots overlapping the region, so results
//! may include entities slightly outside it.

use crate::ecs::Entity;
use std::collections::{HashMap, HashSet};

/// Plot coordinates
type PlotKey = (i64, i64);

/// Entities bucketed by fixed-size square plots
#[derive(Debug, Clone)]
pub struct UniformGrid {
    plot_size: f64,
    plots: HashMap<PlotKey, HashSet<Entity>>,
}

impl UniformGrid {
    /// Create an empty grid
    ///
    /// # Panics
    ///
    /// Panics if plot size is non-positive, NaN, or infinite
    pub fn new(plot_size: f64) -> Self {
        assert!(
            plot_size > 0.0 && plot_size.is_finite(),
            "Plot size must be positive and finite"
        );
        UniformGrid {
            plot_size,
            plots: HashMap::new(),
        }
    }

    /// Side length of one plot
    pub fn plot_size(&self) -> f64 {
        self.plot_size
    }

    fn plot_of(&self, x: f64, y: f64) -> PlotKey {
        (
            (x / self.plot_size).floor() as i64,
            (y / self.plot_size).floor() as i64,
        )
    }

    /// File an entity under the plot containing `(x, y)`
    pub fn add_entity(&mut self, x: f64, y: f64, entity: Entity) {
        let key = self.plot_of(x, y);
        self.plots.entry(key).or_default().insert(entity);
    }

    /// Remove an entity from the plot containing `(x, y)`
    ///
    /// Returns `false` if it was not filed there. Empty plots are dropped.
    pub fn remove_entity(&mut self, x: f64, y: f64, entity: Entity) -> bool {
        let key = self.plot_of(x, y);
        let Some(plot) = self.plots.get_mut(&key) else {
            return false;
        };
        let removed = plot.remove(&entity);
        if plot.is_empty() {
            self.plots.remove(&key);
        }
        removed
    }

    /// Entities in every plot overlapping the region, edges inclusive
    ///
    /// A NaN coordinate or extent matches nothing.
    pub fn entities_in_region(&self, x: f64, y: f64, width: f64, height: f64) -> HashSet<Entity> {
        let mut result = HashSet::new();
        if [x, y, width, height].iter().any(|v| v.is_nan()) {
            return result;
        }
        let (start_x, start_y) = self.plot_of(x, y);
        let (end_x, end_y) = self.plot_of(x + width, y + height);
        if start_x > end_x || start_y > end_y {
            return result;
        }

        let span = (i128::from(end_x) - i128::from(start_x) + 1)
            .saturating_mul(i128::from(end_y) - i128::from(start_y) + 1);
        if span > self.plots.len() as i128 {
            // Fewer stored plots than plots in range
            for ((gx, gy), plot) in &self.plots {
                if (start_x..=end_x).contains(gx) && (start_y..=end_y).contains(gy) {
                    result.extend(plot.iter().copied());
                }
            }
            return result;
        }

        for gx in start_x..=end_x {
            for gy in start_y..=end_y {
                if let Some(plot) = self.plots.get(&(gx, gy)) {
                    result.extend(plot.iter().copied());
                }
            }
        }
        result
    }

    /// Number of non-empty plots
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.plots.clear();
    }
}
