use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gather_core::{ExecConfig, Number};
use gather_exec::{drive, Engine};
use gather_operators::{chunks, filter, limit, map, sliding_window, sorted_natural, Gatherer};
use gather_planner::parse_yaml_pipeline;

fn make_input(n: usize) -> Vec<i64> {
    // Deterministic, unsorted, with repeats.
    (0..n as i64).map(|i| (i * 7919) % 1009).collect()
}

fn bench_window_operators(c: &mut Criterion) {
    let input = make_input(4096);
    let window = sliding_window(16).unwrap();
    c.bench_function("sliding_window_16", |b| {
        b.iter(|| drive(&window, black_box(input.clone())))
    });
    let chunk = chunks(64).unwrap();
    c.bench_function("chunks_64", |b| {
        b.iter(|| drive(&chunk, black_box(input.clone())))
    });
}

fn bench_sort_and_chain(c: &mut Criterion) {
    let input = make_input(4096);
    let sort = sorted_natural();
    c.bench_function("sorted", |b| b.iter(|| drive(&sort, black_box(input.clone()))));

    let chain = filter(|x: &i64| x % 2 == 0)
        .and_then(map(|x: i64| x * 3))
        .and_then(limit(1000).unwrap());
    c.bench_function("filter_map_limit_chain", |b| {
        b.iter(|| drive(&chain, black_box(input.clone())))
    });
}

fn bench_engine(c: &mut Criterion) {
    let input: Vec<Number> = make_input(4096).into_iter().map(Number::Int).collect();
    let pipeline = parse_yaml_pipeline(
        "steps:\n  - op: filter\n    expr: x % 2 == 0\n  - op: map\n    expr: x * 3\n  - op: sliding_window\n    size: 8\n",
    )
    .unwrap();
    let engine = Engine::new(ExecConfig::default());
    c.bench_function("engine_filter_map_window", |b| {
        b.iter(|| engine.run(&pipeline, black_box(input.clone())).unwrap())
    });
}

criterion_group!(operators, bench_window_operators, bench_sort_and_chain, bench_engine);
criterion_main!(operators);
