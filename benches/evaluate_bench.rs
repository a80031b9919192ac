use std::fmt::Write;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flex::runtime::{
    context::Context,
    eval::Evaluator,
    output::OutputSink,
    value::FunctionBody,
};
use flex::syntax::program::Program;

struct Scenario {
    name: &'static str,
    source: String,
    key_ops: u64,
}

/// Sink discarding all output.
struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, text: &str) {
        black_box(text);
    }

    fn clear(&mut self) {}

    fn prompt(&mut self, _message: &str) -> Option<String> {
        None
    }
}

fn run_program(program: &Program, helpers: &[(&str, &Program)]) {
    let mut ctx = Context::default();
    for (name, helper) in helpers {
        ctx.functions_mut()
            .insert(name.to_string(), FunctionBody::Program((*helper).clone()));
    }
    let mut evaluator = Evaluator::new(NullSink);
    evaluator.evaluate(&mut ctx, program).unwrap();
    black_box(ctx.stack().len());
}

fn build_arithmetic_program(count: usize) -> String {
    let mut src = String::with_capacity(count * 12 + 8);
    src.push_str("[0");
    for i in 0..count {
        let _ = write!(src, ", {}, \"+\"", i);
    }
    src.push(']');
    src
}

fn build_indexing_program(count: usize) -> String {
    let mut src = String::with_capacity(count * 40 + 64);
    src.push_str(r#"[{"!": {"rows": {"@": [{"@": [0, 0, 0, 0]}]}}}, "&grid""#);
    for i in 0..count {
        let _ = write!(src, r#", {}, "&grid.rows.0.{}", "$grid.rows.0.{}""#, i, i % 4, i % 4);
    }
    src.push_str(r##", "#flush"]"##);
    src
}

fn build_call_program(count: usize) -> String {
    let mut src = String::with_capacity(count * 10 + 8);
    src.push_str("[1");
    for _ in 0..count {
        src.push_str(r#", "double""#);
    }
    src.push(']');
    src
}

fn bench_evaluate(c: &mut Criterion) {
    let double = Program::parse(r#"["&n", "$n", "$n", "+"]"#).unwrap();
    let scenarios = [
        Scenario {
            name: "arithmetic",
            source: build_arithmetic_program(1_000),
            key_ops: 1_000,
        },
        Scenario {
            name: "indexing",
            source: build_indexing_program(500),
            key_ops: 1_000,
        },
        Scenario {
            name: "calls",
            source: build_call_program(500),
            key_ops: 500,
        },
    ];

    let mut group = c.benchmark_group("evaluate");
    for scenario in &scenarios {
        let program = Program::parse(&scenario.source).unwrap();
        group.throughput(Throughput::Elements(scenario.key_ops));
        group.bench_with_input(
            BenchmarkId::from_parameter(scenario.name),
            &program,
            |b, program| b.iter(|| run_program(program, &[("double", &double)])),
        );
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let source = build_indexing_program(500);
    c.bench_function("parse/indexing", |b| {
        b.iter(|| black_box(Program::parse(black_box(&source)).unwrap()))
    });
}

criterion_group!(benches, bench_evaluate, bench_parse);
criterion_main!(benches);
