use crate::common::*;
use revealer::service::ProviderStatus;
use revealer::{analyze_bytes, DigestAlgorithm, Registry};
use tempfile::tempdir;

#[test]
fn analyze_bytes_has_no_filesystem_effects() {
    let dir = tempdir().unwrap();
    let cwd_before = snapshot(dir.path());
    let conf = config(
        r#"
[features]
base = ["ByteHistogram", "FileSize"]
elf = ["ElfHeader"]
image = ["Grayscale"]
"#,
    );
    let providers = Registry::with_builtins().resolve(&conf.features, &conf.providers);
    let data = pattern(300, 9);
    let analysis = analyze_bytes(&data, &providers, DigestAlgorithm::Sha256);

    assert_eq!(analysis.id, sha256_id(&data));
    assert_eq!(analysis.record["size"], 300);
    assert_eq!(analysis.images.len(), 1);
    assert_eq!(analysis.images[0].artifact.dimensions(), (17, 17));
    assert_eq!(analysis.outcomes.len(), 4);
    assert!(analysis
        .outcomes
        .iter()
        .any(|o| o.provider == "elf.ElfHeader" && matches!(o.status, ProviderStatus::Skipped { .. })));
    assert_eq!(snapshot(dir.path()), cwd_before);
}

#[test]
fn service_and_engine_agree() {
    let dataset = DatasetBuilder::new().sample("malicious", "x", &pattern(500, 1));
    let out = tempdir().unwrap();
    let conf = config("[features]\nbase = [\"ByteHistogram\", \"ByteEntropy\", \"FileSize\"]\n");
    let registry = Registry::with_builtins();
    let engine = revealer::ExtractionEngine::from_config(&conf, &registry, out.path()).unwrap();
    engine
        .run(&revealer::Dataset::open(dataset.root()).unwrap())
        .unwrap();

    let providers = registry.resolve(&conf.features, &conf.providers);
    let data = pattern(500, 1);
    let analysis = analyze_bytes(&data, &providers, DigestAlgorithm::Sha256);
    let on_disk = read_record(out.path(), "malicious", &analysis.id);
    assert_eq!(on_disk, serde_json::Value::Object(analysis.record));
}
