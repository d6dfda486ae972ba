//! Criterion benchmarks for esoval_core sweeps
//!
//! Run with: cargo bench -p esoval_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use esoval_core::{Catalog, EvaluationError, ParameterSet, SweepOptions, sweep_with};

/// Synthetic oracle: a short busy loop standing in for a pricing call.
fn synthetic_oracle(parameters: &ParameterSet) -> Result<f64, EvaluationError> {
    let stock = parameters.get("stock_price").unwrap_or_default();
    let strike = parameters.get("strike_price").unwrap_or_default();
    let volatility = parameters.get("volatility").unwrap_or_default();

    let mut acc = 0.0;
    for i in 0..parameters.iterations * 100 {
        acc += (f64::from(i) * volatility).sin().abs();
    }
    Ok((stock - strike).max(0.0) + acc / f64::from(parameters.iterations * 100))
}

fn bench_sweep_workers(c: &mut Criterion) {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    let Some(variable) = catalog.get("vesting_years") else {
        return;
    };

    let mut group = c.benchmark_group("sweep_vesting_years");
    for workers in [1_usize, 2, 4, 8] {
        let options = SweepOptions::default().workers(workers);
        group.bench_with_input(BenchmarkId::new("workers", workers), &options, |b, options| {
            b.iter(|| {
                sweep_with(
                    black_box(&baseline),
                    variable,
                    &synthetic_oracle,
                    options,
                    None,
                )
            })
        });
    }
    group.finish();
}

fn bench_grid_generation(c: &mut Criterion) {
    let catalog = Catalog::eso();
    c.bench_function("grid_all_variables", |b| {
        b.iter(|| {
            catalog
                .iter()
                .filter_map(|v| esoval_core::SweepRange::for_variable(v).ok())
                .map(|r| r.grid().len())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_sweep_workers, bench_grid_generation);
criterion_main!(benches);
