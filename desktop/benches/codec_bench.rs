use criterion::{Criterion, criterion_group, criterion_main};
use fisc_core::Config;
use fisc_core::record::settings;

fn settings_codec(c: &mut Criterion) {
    let config = Config::default();
    c.bench_function("settings_encode", |b| {
        b.iter(|| settings::encode(&config).unwrap())
    });

    let record = settings::encode(&config).unwrap();
    c.bench_function("settings_decode", |b| {
        b.iter(|| settings::decode(&record[..]).unwrap())
    });
}

criterion_group!(benches, settings_codec);
criterion_main!(benches);
