use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urlguard::{normalize, tokenize, UrlClassifier};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn setup_benchmark_classifier() -> UrlClassifier {
    UrlClassifier::builder()
        .with_artifact_files(
            &fixture_path("tfidf_vectorizer.json"),
            &fixture_path("mnb_classifier.json"),
        )
        .unwrap()
        .build()
        .unwrap()
}

fn bench_tokenization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tokenization");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Short URL (single host)
    group.bench_function("short_url", |b| {
        b.iter(|| tokenize(black_box("example.com")))
    });

    // Typical URL (host + path + dashes)
    group.bench_function("typical_url", |b| {
        b.iter(|| tokenize(black_box("secure-login.weebly.com/account-update/verify")))
    });

    // Long URL (deep path, many delimiters)
    group.bench_function("long_url", |b| {
        b.iter(|| {
            tokenize(black_box(
                "cdn-static.subdomain.hosting-provider.example.com/assets/js/vendor-bundle\
                 /2024-11-05/min-build/app-core-v2.17.3/runtime-polyfills/index",
            ))
        })
    });

    group.finish();
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normalization");
    group.sample_size(50);

    group.bench_function("with_scheme", |b| {
        b.iter(|| normalize(black_box("https://www.example.com/a/b?q=1#frag")))
    });
    group.bench_function("without_scheme", |b| {
        b.iter(|| normalize(black_box("www.example.com/a/b")))
    });

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier();
    let mut group = c.benchmark_group("Classification");
    group.sample_size(50);

    group.bench_function("malicious_url", |b| {
        b.iter(|| {
            classifier
                .classify(black_box("https://yegshfgsa.weebly.com/"))
                .unwrap()
        })
    });
    group.bench_function("benign_url", |b| {
        b.iter(|| classifier.classify(black_box("https://github.com/docs")).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenization,
    bench_normalization,
    bench_classification
);
criterion_main!(benches);
