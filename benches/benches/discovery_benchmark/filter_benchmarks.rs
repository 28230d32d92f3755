use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use discovery::{
    discovery::protocol::{self, PingPayload, PongPayload},
    TopicFilter,
};
use serde_json::json;

const TOPICS: [&str; 4] = [
    "device/cpu/temperature",
    "device/gpu/temperature",
    "room/humidity",
    "device/cpu/load",
];

fn bench_is_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_is_match");
    let filters = [
        ("exact", TopicFilter::exact("device/cpu/temperature").unwrap()),
        ("pattern_substring", TopicFilter::pattern("temp").unwrap()),
        (
            "pattern_anchored",
            TopicFilter::pattern(r"^device/[a-z]+/temperature$").unwrap(),
        ),
    ];

    for (name, filter) in &filters {
        group.bench_with_input(BenchmarkId::from_parameter(name), filter, |b, filter| {
            b.iter(|| {
                for topic in TOPICS {
                    black_box(filter.is_match(black_box(topic)));
                }
            })
        });
    }
    group.finish();
}

fn bench_wire_codec(c: &mut Criterion) {
    let ping = PingPayload {
        topic: TopicFilter::pattern("device/.+/temperature").unwrap(),
    };
    let ping_bytes = protocol::encode(&ping).unwrap();

    c.bench_function("ping_encode", |b| {
        b.iter(|| protocol::encode(black_box(&ping)).unwrap())
    });

    // декодирование пересобирает regex
    c.bench_function("ping_decode", |b| {
        b.iter(|| protocol::decode::<PingPayload>(black_box(&ping_bytes)).unwrap())
    });

    let pong = PongPayload {
        topic: "device/cpu/temperature".into(),
        uuid: "0b7c1f3e-9a52-4d7e-8f0a-2c3b4d5e6f70".into(),
        value: json!({"celsius": 61.5, "sensor": "k10temp"}),
    };
    let pong_bytes = protocol::encode(&pong).unwrap();

    c.bench_function("pong_decode", |b| {
        b.iter(|| protocol::decode::<PongPayload>(black_box(&pong_bytes)).unwrap())
    });
}

criterion_group!(benches, bench_is_match, bench_wire_codec);
criterion_main!(benches);
