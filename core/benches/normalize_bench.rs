use criterion::{criterion_group, criterion_main, Criterion};
use search_core::stemmer::stem;
use search_core::tokenizer::{normalize, tokenize};

const TEXT: &str = "The generalization of relational conditional hopping motoring ponies \
    caresses agreed plastered happily. Boolean retrieval intersects sorted posting lists; \
    operators are evaluated strictly from left to right without precedence.";

fn bench_normalize(c: &mut Criterion) {
    let text = TEXT.repeat(64);
    c.bench_function("tokenize_paragraphs", |b| b.iter(|| tokenize(&text).count()));
    c.bench_function("normalize_paragraphs", |b| b.iter(|| normalize(&text).count()));
    c.bench_function("stem_generalization", |b| b.iter(|| stem("generalization")));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
