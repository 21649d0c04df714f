use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sprout_lsp_core::{suggest_fix, synthesize, Language};

/// Generate Python source of varying sizes for benchmarking, sprinkling in
/// the mistakes the heuristics look for
fn generate_python_source(size: usize) -> String {
    let mut source = String::from("# benchmark module\n\n");

    for i in 0..size {
        source.push_str(&format!(
            "def compute{}(x):\n    return x * {} + {}\n\n",
            i,
            i + 1,
            i * 2
        ));
        // Every tenth block drops its colon
        if i % 10 == 0 {
            source.push_str(&format!("if compute{}(x) > 10\n    print(x)\n\n", i));
        }
    }

    source
}

/// Generate C source of varying sizes, with some missing semicolons
fn generate_c_source(size: usize) -> String {
    let mut source = String::from("#include <stdio.h>\n\nint main() {\n");

    for i in 0..size {
        if i % 10 == 0 {
            source.push_str(&format!("    int v{} = {}\n", i, i));
        } else {
            source.push_str(&format!("    int v{} = {};\n", i, i));
        }
    }

    source.push_str("    return 0;\n}\n");
    source
}

/// Generate PHP source of varying sizes, with bare variable uses
fn generate_php_source(size: usize) -> String {
    let mut source = String::from("<?php\n");

    for i in 0..size {
        source.push_str(&format!("$value{} = {};\n", i, i));
        if i % 20 == 0 {
            source.push_str(&format!("echo value{};\n", i));
        }
    }

    source.push_str("?>\n");
    source
}

/// Benchmark synthesis across languages and sizes
fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");

    for size in [10, 50, 100, 500].iter() {
        let python = generate_python_source(*size);
        group.bench_with_input(
            BenchmarkId::new("python", size),
            &python,
            |b, source| {
                b.iter(|| black_box(synthesize(black_box(source), Language::Python)));
            },
        );

        let c_source = generate_c_source(*size);
        group.bench_with_input(BenchmarkId::new("c", size), &c_source, |b, source| {
            b.iter(|| black_box(synthesize(black_box(source), Language::C)));
        });

        let php = generate_php_source(*size);
        group.bench_with_input(BenchmarkId::new("php", size), &php, |b, source| {
            b.iter(|| black_box(synthesize(black_box(source), Language::Php)));
        });
    }

    group.finish();
}

/// Benchmark the fix suggester over a synthesized diagnostic
fn bench_suggest_fix(c: &mut Criterion) {
    let source = generate_python_source(100);
    let diagnostics = synthesize(&source, Language::Python);
    let diagnostic = diagnostics.first().expect("generated source has findings");

    c.bench_function("suggest_fix", |b| {
        b.iter(|| {
            black_box(suggest_fix(
                black_box(&diagnostic.message),
                Language::Python,
                diagnostic.start_line,
                black_box(&source),
            ))
        });
    });
}

/// Benchmark the advice lookup, matched and fallback paths
fn bench_explain(c: &mut Criterion) {
    let mut group = c.benchmark_group("explain");

    group.bench_function("matched", |b| {
        b.iter(|| {
            black_box(sprout_lsp_core::explain(
                black_box("SyntaxError: invalid syntax"),
                Language::Python,
            ))
        });
    });

    group.bench_function("fallback", |b| {
        b.iter(|| {
            black_box(sprout_lsp_core::explain(
                black_box("something the tables have never seen"),
                Language::Python,
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_synthesize, bench_suggest_fix, bench_explain);
criterion_main!(benches);
