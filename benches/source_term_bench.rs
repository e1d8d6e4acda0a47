//! Benchmarks for source term evaluation.
//!
//! Run with: `cargo bench --bench source_term_bench`
//! (add `--features parallel` for the Rayon-backed loops)
//!
//! Benchmarks geostrophic forcing, the wall closures, the wall momentum
//! flux term and a full level update through `SourceTermSet`.

use std::sync::Arc;

use abl_forcing::prelude::*;
use abl_forcing::source::WallFluxSettings;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Single-level mesh of `n × n × n/2` cells in blocks of 16, with a
/// perturbed near-wall wind.
fn setup_problem(n: usize) -> FieldRepo {
    let dims = [n, n, n / 2];
    let geom = Geometry::new(
        IndexBox::from_dims(dims),
        [0.0; 3],
        [10.0 * n as f64, 10.0 * n as f64, 5.0 * n as f64],
    );
    let mut repo = FieldRepo::new(Arc::new(AmrMesh::single_level(geom, 16)));

    let states = [FieldState::New, FieldState::Old];
    let vel = repo.declare_field("velocity", 3, 1, &states).unwrap();
    let temp = repo.declare_field("temperature", 1, 1, &states).unwrap();
    repo.declare_field("density", 1, 1, &states).unwrap();

    for s in states {
        vel.write()
            .unwrap()
            .fill_state_with(s, |_, i, j, k, cell| {
                let phase = 0.3 * i as f64 + 0.7 * j as f64;
                cell.copy_from_slice(&[8.0 + phase.sin(), 2.0 + phase.cos(), 0.01 * k as f64]);
            })
            .unwrap();
        temp.write().unwrap().fill_state(s, &[300.0]).unwrap();
    }
    repo
}

fn make_mo() -> SharedMoData {
    let mut mo = MoData {
        vel_mean: Vector3::new(8.0, 2.0, 0.0),
        vmag_mean: 68.0f64.sqrt(),
        surf_temp_flux: 0.02,
        ..MoData::default()
    };
    mo.update_fluxes(25);
    SharedMoData::new(mo)
}

fn make_buffers(mesh: &AmrMesh, ncomp: usize) -> Vec<CellArray> {
    mesh.boxes(LevelIndex::ZERO)
        .unwrap()
        .iter()
        .map(|bx| CellArray::new(*bx, ncomp))
        .collect()
}

/// Benchmark the uniform geostrophic forcing over one block.
fn bench_geostrophic(c: &mut Criterion) {
    let mut group = c.benchmark_group("geostrophic");
    let g = GeostrophicForcing::new(86400.0, 45.0, Vector3::new(10.0, 0.0, 0.0), true).unwrap();

    for n in [16, 32, 64] {
        let bx = IndexBox::from_dims([n, n, n]);
        let mut src = CellArray::new(bx, 3);

        group.bench_with_input(BenchmarkId::new("block", format!("{n}^3")), &n, |b, _| {
            b.iter(|| {
                g.evaluate(LevelIndex::ZERO, BlockIndex::ZERO, black_box(&bx), FieldState::New, &mut src)
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark the per-cell cost of each wall closure.
fn bench_closures(c: &mut Criterion) {
    let mut group = c.benchmark_group("wall_closures");
    let mo = make_mo().snapshot();
    let samples: Vec<(f64, f64)> = (0..1024)
        .map(|i| {
            let phase = 0.01 * i as f64;
            (8.0 + phase.sin(), 2.0 + phase.cos())
        })
        .collect();

    for kind in WallShearStressType::ALL {
        let tau = WallShearModel::new(kind, &mo);
        group.bench_function(kind.as_str(), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for &(u, v) in &samples {
                    let wspd = (u * u + v * v).sqrt();
                    sum += tau.calc_vel_x(black_box(u), wspd) + tau.calc_vel_y(black_box(v), wspd);
                }
                sum
            });
        });
    }

    group.finish();
}

/// Benchmark the wall momentum flux term on a wall block.
fn bench_wall_momentum_flux(c: &mut Criterion) {
    let mut group = c.benchmark_group("wall_momentum_flux");
    let repo = setup_problem(64);
    let mesh = Arc::clone(repo.mesh());
    let mo = make_mo();
    let lev = LevelIndex::ZERO;
    let bx = mesh.block_box(lev, BlockIndex::ZERO).unwrap();

    for kind in [
        WallShearStressType::Default,
        WallShearStressType::Moeng,
        WallShearStressType::Local,
    ] {
        let term = WallMomentumFluxForcing::with_settings(
            &repo,
            mo.clone(),
            WallFluxSettings::new(kind, 2),
        )
        .unwrap();
        let mut src = CellArray::new(bx, 3);

        group.bench_function(kind.as_str(), |b| {
            b.iter(|| {
                term.evaluate(lev, BlockIndex::ZERO, black_box(&bx), FieldState::New, &mut src)
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark a full level update with the configured source terms.
fn bench_level_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_update");

    let config = InputConfig::from_json_str(
        r#"{
            "GeostrophicForcing": { "geostrophic_wind": [10.0, 0.0, 0.0], "latitude": 45.0 },
            "ABL": { "wall_shear_stress_type": "moeng" },
            "ICNS": { "source_terms": ["GeostrophicForcing", "GravityForcing", "WallMomentumFluxForcing"] }
        }"#,
    )
    .unwrap();

    for n in [32, 64] {
        let repo = setup_problem(n);
        let mesh = Arc::clone(repo.mesh());
        let wall = AblWallFunction::new(&mesh, &config.abl, &config.incflo).unwrap();
        wall.update(&repo, FieldState::New).unwrap();

        let ctx = SourceTermContext::new(&config, &repo).with_mo(wall.mo());
        let sources = momentum_sources(&ctx).unwrap();
        let mut bufs = make_buffers(&mesh, 3);

        group.bench_with_input(BenchmarkId::new("icns", format!("{n}x{n}x{}", n / 2)), &n, |b, _| {
            b.iter(|| {
                sources
                    .apply_level(&mesh, LevelIndex::ZERO, FieldState::New, black_box(&mut bufs))
                    .unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("wall_function", n), &n, |b, _| {
            b.iter(|| wall.update(black_box(&repo), FieldState::New).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_geostrophic,
    bench_closures,
    bench_wall_momentum_flux,
    bench_level_update
);
criterion_main!(benches);
