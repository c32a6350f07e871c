use crate::common::*;
use revealer::{Dataset, ExtractionEngine, Registry, RevealerError};
use std::fs;
use tempfile::tempdir;

#[test]
fn no_image_provider_means_no_image_tree() {
    let dataset = two_label_dataset();
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config("[features]\nbase = [\"ByteHistogram\"]\n"),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();

    let top: Vec<String> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(top, vec!["json"]);
}

#[test]
fn image_dirs_exist_for_every_label() {
    // Empty samples produce no image, but the directories still exist.
    let dataset = DatasetBuilder::new()
        .sample("benign", "empty", b"")
        .sample("malicious", "empty", b"");
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config("[features]\nimage = [\"Grayscale\"]\n"),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(report.images_written, 0);
    assert_eq!(report.provider_skips, 2);
    for label in ["benign", "malicious"] {
        assert!(out.path().join("json").join(label).is_dir());
        assert!(out.path().join("image/grayscale").join(label).is_dir());
    }
}

#[test]
fn bmp_encoding_changes_extension() {
    let dataset = DatasetBuilder::new().sample("benign", "x", &pattern(64, 5));
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config("[features]\nimage = [\"Grayscale\"]\n[providers]\nimage_format = \"bmp\"\n"),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    let id = sha256_id(&pattern(64, 5));
    let path = out
        .path()
        .join("image/grayscale/benign")
        .join(format!("{}.bmp", id));
    assert_eq!(&fs::read(path).unwrap()[..2], b"BM");
}

#[test]
fn missing_dataset_root_is_fatal() {
    let dir = tempdir().unwrap();
    let err = Dataset::open(dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, RevealerError::DatasetRoot { .. }));
    assert!(err.is_fatal_startup());
}

#[test]
fn loose_root_files_are_ignored() {
    let dataset = DatasetBuilder::new().sample("benign", "a", b"a");
    fs::write(dataset.root().join("stray.bin"), b"stray").unwrap();
    let out = tempdir().unwrap();
    let engine = ExtractionEngine::from_config(
        &config("[features]\nbase = [\"FileSize\"]\n"),
        &Registry::with_builtins(),
        out.path(),
    )
    .unwrap();
    let report = engine.run(&Dataset::open(dataset.root()).unwrap()).unwrap();
    assert_eq!(report.labels, 1);
    assert_eq!(report.samples, 1);
}
