use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use hybrid_engine::{EditorSettings, HybridEditor, HybridEditorSpec, Token};
use hybrid_expr::{Expr, ExprSpec, parse_text};

fn long_sum(terms: usize) -> String {
    (0..terms)
        .map(|i| format!("f(x{i})! * {i}"))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let text = long_sum(200);
    let spec = ExprSpec::new();
    let tokens: Vec<Token<Expr>> = spec.tokenize(&text);

    group.bench_function("parse_text", |b| {
        b.iter(|| std::hint::black_box(parse_text(std::hint::black_box(&text))));
    });

    group.bench_function("parse_tokens", |b| {
        b.iter(|| std::hint::black_box(spec.parse(std::hint::black_box(tokens.clone()))));
    });

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");
    group.sample_size(10);

    let text = long_sum(20).replace(' ', "");

    group.bench_function("type_expression", |b| {
        b.iter(|| {
            let mut editor: HybridEditor<Expr> =
                HybridEditor::new(Rc::new(ExprSpec::new()), &EditorSettings::default());
            editor.type_text(std::hint::black_box(&text)).unwrap();
            std::hint::black_box(editor.is_valid());
        });
    });

    group.bench_function("paste_expression", |b| {
        b.iter(|| {
            let mut editor: HybridEditor<Expr> =
                HybridEditor::new(Rc::new(ExprSpec::new()), &EditorSettings::default());
            editor.paste(std::hint::black_box(&text)).unwrap();
            std::hint::black_box(editor.is_valid());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_typing);
criterion_main!(benches);
