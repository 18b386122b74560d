use citygov::config::GovernorConfig;
use citygov::governor::combination::CombinationCache;
use citygov::governor::Governor;
use citygov::model::{generate_city, CityModel};
use citygov::parameter::Parameter;
use citygov::types::Stat;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn setup_city() -> CityModel {
    let mut rng = fastrand::Rng::with_seed(2024);
    generate_city(&mut rng, 1, 20, 8)
}

fn criterion_benchmark(c: &mut Criterion) {
    let model = setup_city();
    let mut param = Parameter::default();
    param.set_factor(Stat::Shield, 2).set_minimal(Stat::Food, -4);

    c.bench_function("combination_cache (20 tiles, size 8)", |b| {
        b.iter(|| CombinationCache::build(black_box(&model.city), 1024))
    });

    c.bench_function("optimize cold", |b| {
        b.iter(|| {
            let mut gov = Governor::new(GovernorConfig::default());
            gov.optimize(&model.city, &model, black_box(&param))
        })
    });

    let mut warm = Governor::new(GovernorConfig::default());
    let _ = warm.optimize(&model.city, &model, &Parameter::default());
    c.bench_function("optimize warm", |b| {
        b.iter(|| warm.optimize(&model.city, &model, black_box(&param)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
