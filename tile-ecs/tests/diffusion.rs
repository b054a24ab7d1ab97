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
//! Diffusion property tests
//!
//! Conservation-like and steady-state properties of the soil diffusion
//! step on seeded maps.

use tile_ecs::ecs::components::{soil_grid_store, FERTILITY_COMPONENT, MOISTURE_COMPONENT};
use tile_ecs::ecs::{ComponentStorage, DenseStore, Entity, LiveSet, World};
use tile_ecs::random::{random_grid, SeededRng};
use tile_ecs::simulation::{DiffusionConfig, DiffusionSystem, MapTarget};

const WIDTH: usize = 16;
const HEIGHT: usize = 12;

fn seeded_world(maps: usize, seed: u64) -> (World, Vec<Entity>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut world = World::new();
    let mut live = LiveSet::new();
    let mut rng = SeededRng::new(seed);
    let mut moisture = soil_grid_store(WIDTH, HEIGHT, maps).unwrap();
    let mut fertility = soil_grid_store(WIDTH, HEIGHT, maps).unwrap();

    let mut ids = Vec::new();
    for _ in 0..maps {
        let map = world.create_entity(&mut live).unwrap();
        moisture.add(map, random_grid(WIDTH, HEIGHT, 65535.0, &mut rng)).unwrap();
        fertility.add(map, random_grid(WIDTH, HEIGHT, 65535.0, &mut rng)).unwrap();
        ids.push(map);
    }
    world.register_component(MOISTURE_COMPONENT, moisture).unwrap();
    world.register_component(FERTILITY_COMPONENT, fertility).unwrap();
    (world, ids)
}

fn grid(world: &World, name: &str, map: Entity) -> Vec<f64> {
    world
        .component_as::<DenseStore<Vec<f64>>>(name)
        .unwrap()
        .get(map)
        .unwrap()
}

fn spread(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    max - min
}

#[test]
fn test_zero_dt_is_bit_identical() {
    let (mut world, maps) = seeded_world(2, 12345);
    let before = grid(&world, MOISTURE_COMPONENT, maps[0]);

    let system = DiffusionSystem::moisture(WIDTH);
    assert_eq!(system.step(&mut world, 0.0, MapTarget::All).unwrap(), 0);

    let after = grid(&world, MOISTURE_COMPONENT, maps[0]);
    assert!(before.iter().zip(&after).all(|(a, b)| a.to_bits() == b.to_bits()));
}

#[test]
fn test_repeated_steps_flatten_the_grid() {
    let (mut world, maps) = seeded_world(1, 99);
    let before = spread(&grid(&world, MOISTURE_COMPONENT, maps[0]));

    let system = DiffusionSystem::moisture(WIDTH);
    for _ in 0..200 {
        system.step(&mut world, 1.0, MapTarget::All).unwrap();
    }

    let after = grid(&world, MOISTURE_COMPONENT, maps[0]);
    assert!(spread(&after) < before / 2.0);
    assert!(after.iter().all(|v| (0.0..=65535.0).contains(v)));
}

#[test]
fn test_values_stay_within_initial_range() {
    let (mut world, maps) = seeded_world(1, 7);
    let initial = grid(&world, FERTILITY_COMPONENT, maps[0]);
    let low = initial.iter().cloned().fold(f64::MAX, f64::min);
    let high = initial.iter().cloned().fold(f64::MIN, f64::max);

    let system = DiffusionSystem::fertility(WIDTH);
    for _ in 0..10 {
        system.step(&mut world, 1.0, MapTarget::All).unwrap();
        let current = grid(&world, FERTILITY_COMPONENT, maps[0]);
        assert!(current.iter().all(|v| *v >= low && *v <= high));
    }
}

#[test]
fn test_single_map_target_leaves_others() {
    let (mut world, maps) = seeded_world(3, 2024);
    let untouched = grid(&world, MOISTURE_COMPONENT, maps[2]);

    let system = DiffusionSystem::moisture(WIDTH);
    let target = MapTarget::Map(maps[1]);
    assert_eq!(system.step(&mut world, 1.0, target).unwrap(), 1);
    assert_eq!(grid(&world, MOISTURE_COMPONENT, maps[2]), untouched);
}

#[test]
fn test_components_diffuse_independently() {
    let (mut world, maps) = seeded_world(1, 5);
    let fertility = grid(&world, FERTILITY_COMPONENT, maps[0]);

    world.add_system(DiffusionSystem::moisture(WIDTH));
    world.update(1.0).unwrap();

    assert_eq!(grid(&world, FERTILITY_COMPONENT, maps[0]), fertility);
}

#[test]
fn test_known_small_grids() {
    let mut world = World::new();
    let mut store = soil_grid_store(3, 1, 3).unwrap();
    store.add(Entity::new(0), vec![0.0, 100.0, 0.0]).unwrap();
    world.register_component("Row", store).unwrap();

    let mut single = soil_grid_store(1, 1, 1).unwrap();
    single.add(Entity::new(0), vec![500.0]).unwrap();
    world.register_component("Single", single).unwrap();

    let mut uniform = soil_grid_store(3, 3, 1).unwrap();
    uniform.add(Entity::new(0), vec![250.0; 9]).unwrap();
    world.register_component("Uniform", uniform).unwrap();

    DiffusionSystem::new("Row", DiffusionConfig::new(3))
        .step(&mut world, 1.0, MapTarget::All)
        .unwrap();
    DiffusionSystem::new("Single", DiffusionConfig::new(1))
        .step(&mut world, 1.0, MapTarget::All)
        .unwrap();
    DiffusionSystem::new("Uniform", DiffusionConfig::new(3))
        .step(&mut world, 1.0, MapTarget::All)
        .unwrap();

    assert_eq!(grid(&world, "Row", Entity::new(0)), vec![10.0, 90.0, 10.0]);
    assert_eq!(grid(&world, "Single", Entity::new(0)), vec![500.0]);
    assert_eq!(grid(&world, "Uniform", Entity::new(0)), vec![250.0; 9]);
}

#[test]
fn test_display_levels_layout() {
    let (world, maps) = seeded_world(1, 1);
    let system = DiffusionSystem::moisture(WIDTH);
    let levels = system
        .display_component_levels(&world, maps[0])
        .unwrap()
        .unwrap();

    let text = levels.to_string();
    assert_eq!(text.lines().count(), HEIGHT);
    assert!(text.starts_with("{x: 0, y: 0 - "));
    assert_eq!(levels.height(), HEIGHT);
}
