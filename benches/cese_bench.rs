//! Benchmarks for the CESE marching passes.
//!
//! Run with: `cargo bench --bench cese_bench`
//!
//! Compares the serial, host-parallel and accelerator backends on the
//! integrator and CFL passes of 3D Euler on hexahedral blocks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cese_rs::{
    BoundaryKind, CartesianMesh, CeseConfig, CeseState, Dim3, EulerJacobian, ExecutionBackend,
    GasState, MeshBlock, Serial, compute_cfl, compute_soln,
};
#[cfg(feature = "accelerator")]
use cese_rs::Accelerator;
#[cfg(feature = "parallel")]
use cese_rs::HostParallel;

const GAMMA: f64 = 1.4;

/// Periodic `n³` block with a smooth, non-uniform gas state.
fn setup(n: usize) -> (MeshBlock<Dim3>, CeseState<Dim3, 5>) {
    let mesh = CartesianMesh::hexes([n, n, n], [1.0, 1.0, 1.0], BoundaryKind::Periodic).unwrap();
    let mut state = CeseState::<Dim3, 5>::for_mesh(&mesh, 1);
    state.amsca.fill_slot(0, GAMMA);
    for icl in 0..mesh.ncell() {
        let phase = icl as f64 * 0.1;
        let gas = GasState::<Dim3>::new(
            1.0 + 0.2 * phase.sin(),
            [0.3 * phase.cos(), 0.1, -0.2 * phase.sin()],
            1.0 + 0.1 * phase.cos(),
        );
        let ic = icl as isize;
        gas.to_conserved(GAMMA, &mut state.sol[ic]);
        gas.to_conserved(GAMMA, &mut state.soln[ic]);
        state.solt[ic] = [0.01 * phase.sin(); 5];
        state.dsol[ic] = [[0.01 * phase.cos(); 3]; 5];
    }
    state.refresh_ghosts(&mesh);
    (mesh, state)
}

fn bench_backend<B: ExecutionBackend>(
    c: &mut Criterion,
    label: &str,
    backend: &B,
    sizes: &[usize],
) {
    let config = CeseConfig::new(1e-3);

    let mut group = c.benchmark_group("calc_soln");
    for &n in sizes {
        let (mesh, mut state) = setup(n);
        group.bench_with_input(BenchmarkId::new(label, n * n * n), &n, |b, _| {
            b.iter(|| {
                compute_soln(
                    black_box(backend),
                    black_box(&mesh),
                    &mut state,
                    &EulerJacobian,
                    &config,
                )
                .unwrap()
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("calc_cfl");
    for &n in sizes {
        let (mesh, mut state) = setup(n);
        let mut outcomes = Vec::new();
        group.bench_with_input(BenchmarkId::new(label, n * n * n), &n, |b, _| {
            b.iter(|| {
                compute_cfl(
                    black_box(backend),
                    black_box(&mesh),
                    &mut state,
                    &config,
                    &mut outcomes,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

const SIZES: [usize; 3] = [8, 16, 24];

fn bench_serial(c: &mut Criterion) {
    bench_backend(c, "serial", &Serial, &SIZES);
}

#[cfg(feature = "parallel")]
fn bench_host(c: &mut Criterion) {
    bench_backend(c, "host", &HostParallel::new(), &SIZES);
}

#[cfg(not(feature = "parallel"))]
fn bench_host(_c: &mut Criterion) {}

#[cfg(feature = "accelerator")]
fn bench_accelerator(c: &mut Criterion) {
    for block_size in [64, 256] {
        let backend = Accelerator::new(block_size).unwrap();
        bench_backend(c, &format!("accelerator_{}", block_size), &backend, &SIZES);
    }
}

#[cfg(not(feature = "accelerator"))]
fn bench_accelerator(_c: &mut Criterion) {}

criterion_group!(benches, bench_serial, bench_host, bench_accelerator);
criterion_main!(benches);
