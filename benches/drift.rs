//! Performance benchmarks for the validation pipeline.
//!
//! Run with: `cargo bench --bench drift`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Drift check | <50µs | Typical narrative, under 100 words |
//! | Full validation | <100µs | Prose-wrapped JSON, accepted |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rewrite_kernel::{too_much_drift, validate_rewrite, RewriteValidator};

const WORDS: [&str; 12] = [
    "reviewed", "drafted", "conferred", "client", "counsel", "lease",
    "motion", "discovery", "deposition", "settlement", "exhibit", "schedule",
];

/// Build a narrative of `n` words.
fn narrative(n: usize) -> String {
    (0..n)
        .map(|i| format!("{}{}", WORDS[i % WORDS.len()], i / WORDS.len()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Benchmark drift checks by narrative length.
fn bench_drift_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("drift_check");

    for word_count in [10, 50, 200, 1000] {
        let original = narrative(word_count);
        let rewritten = narrative(word_count / 2);

        group.throughput(Throughput::Elements(word_count as u64));
        group.bench_with_input(
            BenchmarkId::new("words", word_count),
            &(original, rewritten),
            |b, (original, rewritten)| {
                b.iter(|| too_much_drift(black_box(original), black_box(rewritten)))
            },
        );
    }

    group.finish();
}

/// Benchmark the full pipeline on accepted and rejected output.
fn bench_validate(c: &mut Criterion) {
    let original = narrative(40);
    let accepted = format!(
        "Here you go:\n{}\nThanks!",
        serde_json::json!({
            "standard": narrative(40),
            "client_compliant": narrative(40),
            "audit_safe": narrative(40),
            "notes": "none",
        })
    );
    let garbage = "The model declined to answer.".to_string();

    c.bench_function("validate_accepted", |b| {
        b.iter(|| validate_rewrite(black_box(&original), 1.0, None, black_box(&accepted)))
    });

    let validator = RewriteValidator::default();
    c.bench_function("validate_malformed", |b| {
        b.iter(|| validator.evaluate(black_box(&original), black_box(&garbage)))
    });
}

criterion_group!(benches, bench_drift_check, bench_validate);
criterion_main!(benches);
