use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cinderkv_bench::sample_keys;
use cinderkv_core::hash::murmur3_32;

fn bench_murmur3(c: &mut Criterion) {
    let mut group = c.benchmark_group("murmur3_32");

    for len in [8usize, 64, 512] {
        let data = vec![0xabu8; len];
        group.bench_function(format!("{len}B"), |b| {
            b.iter(|| murmur3_32(black_box(&data), 0));
        });
    }

    let keys = sample_keys(1024);
    group.bench_function("key_mix", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for key in &keys {
                acc ^= murmur3_32(black_box(key.as_bytes()), 0);
            }
            acc
        });
    });

    group.finish();
}

criterion_group!(benches, bench_murmur3);
criterion_main!(benches);
