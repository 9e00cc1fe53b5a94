use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use heatdist::algs::communicator::LocalComm;
use heatdist::algs::init::init;
use heatdist::algs::stencil::update;
use heatdist::config::HeatConfig;
use heatdist::driver::HeatSolver;
use heatdist::grid::GridBuffer;
use heatdist::topology::RowBand;

fn bench_stencil_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("stencil_update");

    for &n in &[256usize, 1024] {
        let band = RowBand { start: 0, stop: n };
        let mut src = GridBuffer::<f32>::new(n);
        init(band, &mut src.view_mut());
        let mut dst = GridBuffer::<f32>::new(n);

        group.bench_with_input(BenchmarkId::new("full_grid", n), &n, |b, _| {
            b.iter(|| update(band, &mut dst.view_mut(), black_box(src.view())))
        });
    }
    group.finish();
}

fn bench_decomposed_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("decomposed_steps");
    group.sample_size(10);

    for &ranks in &[1usize, 2, 4] {
        let cfg = HeatConfig::new(256, 20);
        group.bench_with_input(BenchmarkId::new("ranks", ranks), &ranks, |b, &ranks| {
            b.iter(|| {
                LocalComm::run_group(ranks, |comm| {
                    let mut s = HeatSolver::<f32, _>::new(&cfg, &comm).unwrap();
                    s.run_steps(cfg.steps).unwrap();
                    black_box(s.local_sum())
                })
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stencil_update, bench_decomposed_steps);
criterion_main!(benches);
