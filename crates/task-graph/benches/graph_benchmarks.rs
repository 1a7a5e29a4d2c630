//! Benchmarks for dependency graph operations
//!
//! Run with: cargo bench -p scaffold-task-graph

#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scaffold_task_graph::{DependencyGraph, Task, TaskId};
use std::hint::black_box;

/// Titles that chain lexically: each task starts "after" the previous one.
fn lexical_chain(task_count: usize) -> Vec<Task> {
    (0..task_count)
        .map(|i| {
            if i == 0 {
                Task::new("step 0")
            } else {
                Task::new(format!("step {i} after step {}", i - 1))
            }
        })
        .collect()
}

/// Many tasks hanging off a single root through explicit references.
fn wide_batch(task_count: usize) -> Vec<Task> {
    std::iter::once(Task::new("root"))
        .chain((0..task_count).map(|i| Task::new(format!("leaf {i}")).depends_on("root")))
        .collect()
}

/// A deep chain linked by identifier, untouched by lexical inference.
fn deep_batch(depth: usize) -> Vec<Task> {
    (0..depth)
        .map(|i| {
            let task = Task::new(String::new());
            if i == 0 {
                task
            } else {
                task.depends_on(TaskId::from_index(i - 1).to_string())
            }
        })
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [10, 50, 200] {
        let tasks = lexical_chain(size);
        group.bench_with_input(BenchmarkId::new("lexical_chain", size), &tasks, |b, tasks| {
            b.iter(|| DependencyGraph::build(black_box(tasks.clone())));
        });
    }

    for size in [100, 1000] {
        let tasks = wide_batch(size);
        group.bench_with_input(BenchmarkId::new("wide", size), &tasks, |b, tasks| {
            b.iter(|| DependencyGraph::build(black_box(tasks.clone())));
        });
    }

    group.finish();
}

fn bench_execution_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("execution_order");

    for size in [100, 1000, 10_000] {
        let graph = DependencyGraph::build(deep_batch(size));
        group.bench_with_input(BenchmarkId::new("deep", size), &graph, |b, graph| {
            b.iter(|| black_box(graph.execution_order().unwrap()));
        });
    }

    for size in [100, 1000] {
        let graph = DependencyGraph::build(wide_batch(size));
        group.bench_with_input(BenchmarkId::new("wide", size), &graph, |b, graph| {
            b.iter(|| black_box(graph.execution_levels().unwrap()));
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let graph = DependencyGraph::build(deep_batch(1000));
    let last = TaskId::from_position(1000);

    group.bench_function("dependency_chain_deep_1000", |b| {
        b.iter(|| black_box(graph.dependency_chain(black_box(&last))));
    });
    group.bench_function("validate_deep_1000", |b| {
        b.iter(|| black_box(graph.validate()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_execution_order,
    bench_queries
);
criterion_main!(benches);
