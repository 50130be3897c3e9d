use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use textconv::{ConversionEngine, EncodingFormat};

fn sample_text(len: usize) -> String {
    "Hello, 世界! Ünïcödé 😀 ".chars().cycle().take(len).collect()
}

fn benchmark_from_utf8(c: &mut Criterion) {
    let engine = ConversionEngine::new();
    let text = sample_text(4096);
    let mut group = c.benchmark_group("from_utf8");

    for target in EncodingFormat::ALL {
        if target == EncodingFormat::Ascii || target == EncodingFormat::Iso8859_1 {
            continue;
        }
        group.bench_with_input(BenchmarkId::from_parameter(target), &text, |b, text| {
            b.iter(|| engine.convert_str(black_box(text), EncodingFormat::Utf8, target))
        });
    }
    group.finish();
}

fn benchmark_to_utf8(c: &mut Criterion) {
    let engine = ConversionEngine::new();
    let text = sample_text(4096);
    let mut group = c.benchmark_group("to_utf8");

    for source in [
        EncodingFormat::Hex,
        EncodingFormat::Binary,
        EncodingFormat::UnicodeEscape,
    ] {
        let framed = engine
            .convert_str(&text, EncodingFormat::Utf8, source)
            .map(|conversion| conversion.output)
            .unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(source), &framed, |b, framed| {
            b.iter(|| engine.convert_str(black_box(framed), source, EncodingFormat::Utf8))
        });
    }
    group.finish();
}

fn benchmark_utf16_bytes(c: &mut Criterion) {
    let engine = ConversionEngine::new();
    let encoded = engine
        .convert_str(&sample_text(4096), EncodingFormat::Utf8, EncodingFormat::Utf16)
        .map(|conversion| conversion.encoded)
        .unwrap_or_default();

    c.bench_function("utf16_bytes_to_hex", |b| {
        b.iter(|| engine.convert_bytes(black_box(&encoded), EncodingFormat::Utf16, EncodingFormat::Hex))
    });
}

criterion_group!(
    benches,
    benchmark_from_utf8,
    benchmark_to_utf8,
    benchmark_utf16_bytes
);
criterion_main!(benches);
