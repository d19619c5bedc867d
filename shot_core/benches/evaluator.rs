use chrono::Local;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use shot_core::{History, ShotConfiguration, classify, evaluate, recommend_grind_time};
use std::hint::black_box;

// Brew times spread over the fast/perfect/slow bands
fn synth_times(n: usize, seed: u32) -> Vec<f64> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    (0..n).map(|_| next_f64() * 45.0).collect()
}

fn bench_classify(c: &mut Criterion) {
    let times = synth_times(4096, 0xC0FFEE);
    c.bench_function("classify_4096", |b| {
        b.iter(|| {
            for &t in &times {
                black_box(classify(black_box(t)));
            }
        })
    });
}

fn bench_recommend(c: &mut Criterion) {
    c.bench_function("recommend_grind_time", |b| {
        b.iter(|| recommend_grind_time(black_box(8.0), black_box(Some(20.0)), black_box(18.0)))
    });
}

fn bench_record(c: &mut Criterion) {
    let cfg = ShotConfiguration::default();
    let times = synth_times(256, 7);
    let at = Local::now();
    c.bench_function("evaluate_and_record_256", |b| {
        b.iter_batched(
            History::new,
            |mut h| {
                for &t in &times {
                    h.record(evaluate(&cfg, t, 36.0, at));
                }
                h
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_classify, bench_recommend, bench_record);
criterion_main!(benches);
