//! Criterion benchmarks for plugin_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use plugin_logger::prelude::*;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

fn noop_plugin(name: &str) -> HookPlugin {
    HookPlugin::builder(name).handle(|_| Ok(())).build()
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = rt
        .block_on(async { Logger::builder().plugin(noop_plugin("noop")).build() })
        .expect("Failed to build logger");

    group.bench_function("info_no_extras", |b| {
        b.iter(|| rt.block_on(logger.info(black_box("Info message"), vec![])));
    });

    group.bench_function("info_with_extras", |b| {
        b.iter(|| {
            let extras = vec![Value::from(42), Value::from("user-7")];
            rt.block_on(logger.info(black_box("Info message"), extras))
        });
    });

    group.bench_function("suppressed_by_level", |b| {
        b.iter(|| rt.block_on(logger.log(black_box("trace"), "ignored", vec![])));
    });

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("fan_out");

    for plugins in [1usize, 4, 16] {
        let logger = rt
            .block_on(async {
                let mut builder = Logger::builder();
                for i in 0..plugins {
                    builder = builder.plugin(noop_plugin(&format!("noop-{}", i)));
                }
                builder.build()
            })
            .expect("Failed to build logger");

        group.throughput(Throughput::Elements(plugins as u64));
        group.bench_with_input(BenchmarkId::from_parameter(plugins), &logger, |b, logger| {
            b.iter(|| rt.block_on(logger.warn(black_box("fan out"), vec![])));
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    let logger = rt
        .block_on(async {
            Logger::builder()
                .filter(|event: &LogEvent| !event.message.is_null())
                .format(|event: &LogEvent| {
                    Value::from(format!("{}{}", event.message, encode_all(&event.extras)))
                })
                .plugin(noop_plugin("noop"))
                .build()
        })
        .expect("Failed to build logger");

    group.bench_function("filter_and_format", |b| {
        b.iter(|| {
            let user = Object::new().with_field("user", "X");
            rt.block_on(logger.info(black_box("Hello"), vec![Value::from(user)]))
        });
    });

    group.finish();
}

// ============================================================================
// Encoder Benchmarks
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("plain_string", |b| {
        let value = Value::from("Simple message");
        b.iter(|| encode(black_box(&value)));
    });

    group.bench_function("flat_object", |b| {
        let value = Value::from(
            Object::new()
                .with_field("user_id", 12345)
                .with_field("action", "login")
                .with_field("success", true),
        );
        b.iter(|| encode(black_box(&value)));
    });

    group.bench_function("cyclic_object", |b| {
        let node = Object::new().with_field("name", "root");
        node.insert("self", node.clone());
        let value = Value::from(node);
        b.iter(|| encode(black_box(&value)));
    });

    group.bench_function("nested_array", |b| {
        let value = Value::from(
            (0..64)
                .map(|i| Value::from(vec![Value::from(i), Value::bytes(vec![i as u8; 8])]))
                .collect::<Vec<_>>(),
        );
        b.iter(|| encode(black_box(&value)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_dispatch,
    bench_fan_out,
    bench_pipeline,
    bench_encode,
);

criterion_main!(benches);
