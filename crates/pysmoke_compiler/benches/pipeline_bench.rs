//! Benchmark harness for the pysmoke pipeline.
//!
//! Run with: cargo bench -p pysmoke_compiler

use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pysmoke_compiler::demo::run_demo;
use pysmoke_compiler::Program;
use pysmoke_options::RunOptions;

fn bench_check(c: &mut Criterion) {
    c.bench_function("check_smoke_script", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = Program::smoke(&arena, RunOptions::default());
            black_box(program.check().symbols.symbols().len());
        });
    });
}

fn bench_execute(c: &mut Criterion) {
    c.bench_function("execute_smoke_script", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = Program::smoke(&arena, RunOptions::default());
            let mut out = Vec::with_capacity(128);
            program.execute(&mut out).ok();
            black_box(out.len());
        });
    });
}

fn bench_native_demo(c: &mut Criterion) {
    c.bench_function("native_demo", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(128);
            run_demo(&mut out).ok();
            black_box(out.len());
        });
    });
}

criterion_group!(benches, bench_check, bench_execute, bench_native_demo);
criterion_main!(benches);
