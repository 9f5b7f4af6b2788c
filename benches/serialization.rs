use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_sexpr::{from_str, parse, render, to_string};

#[derive(Serialize, Deserialize, Clone)]
struct Net {
    id: u32,
    name: String,
    class: String,
    routed: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Pad {
    name: String,
    position: (f64, f64),
    width: f64,
    height: f64,
}

#[derive(Serialize, Deserialize, Clone)]
struct Footprint {
    name: String,
    #[serde(rename = "pad")]
    pads: Vec<Pad>,
}

fn footprint(size: u32) -> Footprint {
    Footprint {
        name: format!("QFN-{}", size),
        pads: (0..size)
            .map(|i| Pad {
                name: i.to_string(),
                position: (f64::from(i) * 0.5, -1.27),
                width: 0.3,
                height: 0.8,
            })
            .collect(),
    }
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let net = Net {
        id: 123,
        name: "VCC".to_string(),
        class: "power".to_string(),
        routed: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&net), "net"))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let text = "(net (id 123) (name \"VCC\") (class \"power\") (routed true))\n";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<Net>(black_box(text)))
    });
}

fn benchmark_serialize_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_container");

    for size in [10, 50, 100, 500].iter() {
        let data = footprint(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&data), "footprint"))
        });
    }
    group.finish();
}

fn benchmark_deserialize_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_container");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&footprint(*size), "footprint").unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_str::<Footprint>(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_parse_render(c: &mut Criterion) {
    let text = to_string(&footprint(200), "footprint").unwrap();
    let tree = parse(&text).unwrap();

    c.bench_function("parse_document", |b| b.iter(|| parse(black_box(&text))));
    c.bench_function("render_document", |b| b.iter(|| render(black_box(&tree))));
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_container,
    benchmark_deserialize_container,
    benchmark_parse_render
);
criterion_main!(benches);
