#[macro_use]
extern crate criterion;
extern crate label_registry;

use criterion::Criterion;
use label_registry::LabelRegistry;


// ===========================================================================
// ===== Functions to generate instances with a given size
// ===========================================================================
fn range_registry(size: usize) -> LabelRegistry {
    LabelRegistry::with_range(size)
}

fn string_registry(size: usize) -> LabelRegistry {
    (0..size).map(|i| format!("v{}", i)).collect()
}

fn shifted_registry(size: usize) -> LabelRegistry {
    // Every label diverges from its position by one.
    (1..=size).collect()
}


// ===========================================================================
// ===== The actual benchmarks
// ===========================================================================

fn push_identity(c: &mut Criterion) {
    c.bench_function("push_identity", |b| {
        b.iter_with_setup(
            || LabelRegistry::new(),
            |mut reg| {
                reg.push(0).unwrap();
                reg
            },
        );
    });
}

fn push_divergent(c: &mut Criterion) {
    c.bench_function("push_divergent", |b| {
        b.iter_with_setup(
            || LabelRegistry::new(),
            |mut reg| {
                reg.push("x").unwrap();
                reg
            },
        );
    });
}

fn contains_in_range_mode(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "contains_in_range_mode",
        |b, size| {
            let reg = range_registry(*size);
            let probe = size / 2;
            b.iter(|| reg.contains(probe));
        },
        vec![1, 1000, 100_000],
    );
}

fn contains_in_mapped_mode(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "contains_in_mapped_mode",
        |b, size| {
            let reg = shifted_registry(*size);
            let probe = size / 2;
            b.iter(|| reg.contains(probe));
        },
        vec![1, 1000, 100_000],
    );
}

fn index_of_string_labels(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "index_of_string_labels",
        |b, size| {
            let reg = string_registry(*size);
            let probe = format!("v{}", size / 2);
            b.iter(|| reg.index_of(probe.as_str()));
        },
        vec![1, 1000, 100_000],
    );
}

fn relabel_swap(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "relabel_swap",
        |b, size| {
            b.iter_with_setup(
                || string_registry(*size),
                |mut reg| {
                    reg.relabel(vec![("v0", "v1"), ("v1", "v0")]).unwrap();
                    reg
                },
            );
        },
        vec![2, 1000, 100_000],
    );
}

fn collapse_to_range(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "collapse_to_range",
        |b, size| {
            b.iter_with_setup(
                || string_registry(*size),
                |mut reg| {
                    reg.collapse_to_range();
                    reg
                },
            );
        },
        vec![1, 1000, 100_000],
    );
}

criterion_group!(
    benches,
    push_identity,
    push_divergent,
    contains_in_range_mode,
    contains_in_mapped_mode,
    index_of_string_labels,
    relabel_swap,
    collapse_to_range,
);
criterion_main!(benches);
