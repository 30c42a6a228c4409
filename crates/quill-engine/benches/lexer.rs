use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quill_engine::parser::{Interner, Lexer};
use quill_engine::{parse_program, Interpreter, InterpreterOptions};

fn lex(source: &str) -> usize {
    let mut interner = Interner::new();
    Lexer::new(black_box(source), &mut interner).tokenize().unwrap().len()
}

fn bench_keywords(c: &mut Criterion) {
    let source = "var let const function if else for while do return with try catch finally throw new this typeof";

    c.bench_function("lex_keywords", |b| b.iter(|| lex(source)));
}

fn bench_arrows(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrows");

    let concise = "var f = (a, b) => a + b; var g = x => x * 2; var h = () => 42;";
    group.bench_with_input(BenchmarkId::new("lex", "concise"), &concise, |b, source| {
        b.iter(|| lex(source))
    });

    let nested = "var curry = a => b => c => d => a + b + c + d; curry(1)(2)(3)(4);";
    group.bench_with_input(BenchmarkId::new("parse", "nested"), &nested, |b, source| {
        b.iter(|| {
            let mut interner = Interner::new();
            parse_program(black_box(source), &mut interner, false).unwrap()
        })
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    let line = "var area = (w, h) => { 'use strict'; return w * h; }; // rectangle\n";
    let source = line.repeat(200);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("lex_200_lines", |b| b.iter(|| lex(&source)));

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let source = "var sum = 0; for (var i = 0; i < 1000; i++) { sum = ((a, b) => a + b)(sum, i); } sum";

    c.bench_function("evaluate_arrow_loop", |b| {
        b.iter(|| {
            let mut interp = Interpreter::new(InterpreterOptions::default());
            interp.evaluate_program(black_box(source)).unwrap()
        })
    });
}

criterion_group!(benches, bench_keywords, bench_arrows, bench_throughput, bench_evaluate);
criterion_main!(benches);
