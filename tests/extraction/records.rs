use crate::common::*;
use revealer::{Dataset, ExtractionEngine, Registry};
use tempfile::tempdir;

const HISTOGRAM_AND_GRAYSCALE: &str = r#"
[features]
base = ["ByteHistogram"]
image = ["Grayscale"]
"#;

fn isqrt(n: usize) -> u32 {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r as u32
}

#[test]
fn histogram_and_grayscale_over_two_labels() {
    let dataset = two_label_dataset();
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config(HISTOGRAM_AND_GRAYSCALE),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(report.labels, 2);
    assert_eq!(report.samples, 4);
    assert_eq!(report.records_written, 4);
    assert_eq!(report.images_written, 4);
    assert_eq!(report.provider_failures, 0);

    let samples: [(&str, Vec<u8>); 4] = [
        ("benign", pattern(1000, 3)),
        ("benign", b"abc".to_vec()),
        ("malicious", pattern(4096, 7)),
        ("malicious", pattern(77, 11)),
    ];
    for (label, data) in &samples {
        let id = sha256_id(data);
        let record = read_record(out.path(), label, &id);
        let hist = record["byte_histogram"].as_array().unwrap();
        assert_eq!(hist.len(), 256);
        let total: u64 = hist.iter().map(|v| v.as_u64().unwrap()).sum();
        assert_eq!(total, data.len() as u64);

        let image = out
            .path()
            .join("image/grayscale")
            .join(label)
            .join(format!("{}.png", id));
        let (w, h) = image::image_dimensions(&image).unwrap();
        assert_eq!(w, h);
        assert_eq!(w, isqrt(data.len()));
    }
}

#[test]
fn rerun_is_idempotent() {
    let dataset = two_label_dataset();
    let out = tempdir().unwrap();
    let conf = config(
        r#"
[features]
base = ["ByteHistogram", "FileSize", "ByteEntropy", "FileType"]
image = ["Grayscale"]
"#,
    );
    let engine =
        ExtractionEngine::from_config(&conf, &Registry::with_builtins(), out.path()).unwrap();
    let ds = Dataset::open(dataset.root()).unwrap();

    engine.run(&ds).unwrap();
    let first = snapshot(out.path());
    engine.run(&ds).unwrap();
    let second = snapshot(out.path());
    assert_eq!(first.len(), 8);
    assert_eq!(first, second);
}

#[test]
fn duplicate_content_collapses_to_one_record() {
    let dataset = DatasetBuilder::new()
        .sample("benign", "a.bin", b"same bytes")
        .sample("benign", "copy-of-a.bin", b"same bytes");
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config("[features]\nbase = [\"FileSize\"]\n"),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(report.samples, 2);
    let files = snapshot(out.path());
    assert_eq!(files.len(), 1);
    assert_eq!(read_record(out.path(), "benign", &sha256_id(b"same bytes"))["size"], 10);
}

#[test]
fn blake3_addresses_name_the_outputs() {
    let dataset = DatasetBuilder::new().sample("benign", "x", b"payload");
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config("digest = \"blake3\"\n[features]\nbase = [\"FileSize\"]\n"),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    let id = revealer::ContentAddress::of(b"payload", revealer::DigestAlgorithm::Blake3);
    assert_eq!(read_record(out.path(), "benign", &id)["size"], 7);
}

#[test]
fn format_providers_skip_non_executables() {
    let dataset = DatasetBuilder::new().sample("benign", "readme.txt", b"just text, no headers");
    let out = tempdir().unwrap();
    let conf = config(
        r#"
[features]
base = ["FileSize"]
elf = ["ElfHeader", "Sections", "ElfLibraries"]
pe = ["GeneralFileInfo", "MsDosHeader", "PeHeader"]
"#,
    );
    let engine =
        ExtractionEngine::from_config(&conf, &Registry::with_builtins(), out.path()).unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(report.provider_skips, 6);
    assert_eq!(report.provider_failures, 0);

    let record = read_record(out.path(), "benign", &sha256_id(b"just text, no headers"));
    let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["size"]);
}
