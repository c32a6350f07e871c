use crate::common::*;
use revealer::error::{Result, RevealerError};
use revealer::providers::FeatureMap;
use revealer::{Dataset, Extraction, ExtractionEngine, FeatureProvider, OutputKind, Registry};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

struct AlwaysFails {
    calls: Arc<AtomicUsize>,
}

impl FeatureProvider for AlwaysFails {
    fn name(&self) -> &str {
        "always_fails"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, _data: &[u8]) -> Result<Extraction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RevealerError::extraction("always_fails", "corrupt input"))
    }
}

struct Panics;

impl FeatureProvider for Panics {
    fn name(&self) -> &str {
        "panics"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let _ = data[data.len() + 1];
        unreachable!()
    }
}

struct ConstantSize(u64);

impl FeatureProvider for ConstantSize {
    fn name(&self) -> &str {
        "constant_size"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, _data: &[u8]) -> Result<Extraction> {
        let mut map = FeatureMap::new();
        map.insert("size".to_string(), json!(self.0));
        Ok(Extraction::Scalar(map))
    }
}

#[test]
fn failing_provider_never_aborts_the_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::with_builtins();
    let counter = Arc::clone(&calls);
    registry.register("broken", "AlwaysFails", move |_| {
        Box::new(AlwaysFails {
            calls: Arc::clone(&counter),
        })
    });
    registry.register("broken", "Panics", |_| Box::new(Panics));

    let dataset = two_label_dataset();
    let out = tempdir().unwrap();
    let conf = config(
        r#"
[features]
base = ["FileSize"]
broken = ["AlwaysFails", "Panics"]
"#,
    );
    let engine = ExtractionEngine::from_config(&conf, &registry, out.path()).unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(report.records_written, 4);
    assert_eq!(report.provider_failures, 8);

    let record = read_record(out.path(), "benign", &sha256_id(b"abc"));
    assert_eq!(record, json!({"size": 3}));
}

#[test]
fn failures_are_isolated_under_parallel_workers() {
    let mut registry = Registry::with_builtins();
    registry.register("broken", "Panics", |_| Box::new(Panics));
    let dataset = two_label_dataset();
    let out = tempdir().unwrap();
    let conf = config(
        r#"
[features]
base = ["FileSize"]
broken = ["Panics"]

[engine]
workers = 4
"#,
    );
    let engine = ExtractionEngine::from_config(&conf, &registry, out.path()).unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(report.records_written, 4);
    assert_eq!(report.provider_failures, 4);
}

#[test]
fn later_provider_wins_size_collision() {
    let mut registry = Registry::with_builtins();
    registry.register("override", "ConstantSize", |_| Box::new(ConstantSize(42)));
    let dataset = DatasetBuilder::new().sample("benign", "x", b"12345");

    let size_with = |document: &str| {
        let out = tempdir().unwrap();
        let engine = ExtractionEngine::from_config(&config(document), &registry, out.path()).unwrap();
        engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
        read_record(out.path(), "benign", &sha256_id(b"12345"))
    };

    // Groups register in the order the document lists them.
    assert_eq!(
        size_with("[features]\nbase = [\"FileSize\"]\noverride = [\"ConstantSize\"]\n"),
        json!({"size": 42})
    );
    assert_eq!(
        size_with("[features]\noverride = [\"ConstantSize\"]\nbase = [\"FileSize\"]\n"),
        json!({"size": 5})
    );
    let json_dir = tempdir().unwrap();
    let json_conf = json_dir.path().join("conf.json");
    std::fs::write(
        &json_conf,
        r#"{"features": {"override": ["ConstantSize"], "base": ["FileSize"]}}"#,
    )
    .unwrap();
    let conf = revealer::RevealerConfig::load_from_file(&json_conf).unwrap();
    let out = tempdir().unwrap();
    ExtractionEngine::from_config(&conf, &registry, out.path())
        .unwrap()
        .run(&Dataset::open(dataset.root()).unwrap())
        .unwrap();
    assert_eq!(read_record(out.path(), "benign", &sha256_id(b"12345")), json!({"size": 5}));

    // Within a group, list order decides.
    let mut registry = Registry::with_builtins();
    registry.register("base", "ConstantSize", |_| Box::new(ConstantSize(42)));
    let out = tempdir().unwrap();
    let conf = config("[features]\nbase = [\"ConstantSize\", \"FileSize\"]\n");
    let engine = ExtractionEngine::from_config(&conf, &registry, out.path()).unwrap();
    engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(read_record(out.path(), "benign", &sha256_id(b"12345")), json!({"size": 5}));
}

#[test]
fn unknown_entries_are_skipped() {
    let conf = config(
        r#"
[features]
base = ["FileSize", "NoSuchExtractor"]
nosuchgroup = ["Anything"]
"#,
    );
    let out = tempdir().unwrap();
    let engine =
        ExtractionEngine::from_config(&conf, &Registry::with_builtins(), out.path()).unwrap();
    assert_eq!(engine.providers().keys(), vec!["base.FileSize"]);
}
