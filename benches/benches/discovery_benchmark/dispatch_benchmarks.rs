use std::{hint::black_box, sync::Arc};

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use discovery::{
    bus::{event_handler, Broker, Message, MessageBus},
    LocalResource, ResourceManager, TopicFilter,
};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_send_event(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("broker_send_event");

    for listeners in [0usize, 1, 8] {
        let broker = Broker::new();
        rt.block_on(async {
            for _ in 0..listeners {
                broker
                    .add_event_listener(
                        "evt",
                        None,
                        event_handler(|msg: Message| async move {
                            black_box(msg.payload.len());
                        }),
                    )
                    .await
                    .unwrap();
            }
        });

        group.bench_with_input(
            BenchmarkId::from_parameter(listeners),
            &broker,
            |b, broker| {
                b.to_async(&rt).iter(|| async {
                    broker
                        .send_event("evt", None, Bytes::from_static(b"payload"))
                        .await
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

/// Ping по шине с N загруженными ресурсами: половина проходит фильтр.
fn bench_ping_round(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("manager_ping_round");

    for resources in [10usize, 100] {
        let bus = Arc::new(Broker::new());
        let manager = ResourceManager::builder(TopicFilter::pattern("^even/").unwrap())
            .ping_on_load(false)
            .build()
            .unwrap();

        let locals: Vec<LocalResource> = rt.block_on(async {
            let mut locals = Vec::with_capacity(resources);
            for i in 0..resources {
                let prefix = if i % 2 == 0 { "even" } else { "odd" };
                let res = LocalResource::builder(format!("{prefix}/{i}"))
                    .value(i as u64)
                    .build()
                    .unwrap();
                res.load(bus.clone()).await.unwrap();
                locals.push(res);
            }
            manager.load(bus.clone()).await.unwrap();
            locals
        });

        group.bench_with_input(
            BenchmarkId::from_parameter(resources),
            &manager,
            |b, manager| b.to_async(&rt).iter(|| async { manager.ping().await.unwrap() }),
        );

        drop(locals);
    }
    group.finish();
}

criterion_group!(benches, bench_send_event, bench_ping_round);
criterion_main!(benches);
