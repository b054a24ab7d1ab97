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
//! Benchmarks for the diffusion step
//!
//! Measures one relaxation step over square grids of increasing size, both
//! through the world (store lookup, quantized write-back) and on the raw
//! kernel. Build with `--features parallel` to compare the rayon kernel.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tile_ecs::ecs::components::{soil_grid_store, MOISTURE_COMPONENT};
use tile_ecs::ecs::{ComponentStorage, Entity, World};
use tile_ecs::random::{random_grid, SeededRng};
use tile_ecs::simulation::{diffuse_cells, DiffusionSystem, MapTarget, DEFAULT_RATE};

fn bench_diffusion_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("diffusion_kernel");

    for side in [32, 128, 512].iter() {
        let cells = random_grid(*side, *side, 65535.0, &mut SeededRng::new(12345));
        group.throughput(Throughput::Elements(cells.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, &side| {
            b.iter(|| black_box(diffuse_cells(&cells, side, DEFAULT_RATE)));
        });
    }

    group.finish();
}

fn bench_diffusion_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("diffusion_world_step");

    for side in [32, 128, 512].iter() {
        let mut world = World::new();
        let mut store = soil_grid_store(*side, *side, 1).expect("valid store");
        let mut rng = SeededRng::new(12345);
        let _ = store.add(Entity::new(0), random_grid(*side, *side, 65535.0, &mut rng));
        let _ = world.register_component(MOISTURE_COMPONENT, store);
        let system = DiffusionSystem::moisture(*side);

        group.throughput(Throughput::Elements((*side * *side) as u64));
        group.bench_function(BenchmarkId::from_parameter(side), |b| {
            b.iter(|| black_box(system.step(&mut world, 1.0, MapTarget::All)));
        });
    }

    group.finish();
}

criterion_group!(diffusion_benches, bench_diffusion_kernel, bench_diffusion_world_step);
criterion_main!(diffusion_benches);
