//! Common test utilities and helpers.

use revealer::{ContentAddress, DigestAlgorithm, RevealerConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Scratch dataset rooted in a temporary directory.
pub struct DatasetBuilder {
    dir: TempDir,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Writes `data` to `<root>/<label>/<name>`, creating directories as needed.
    pub fn sample(self, label: &str, name: &str, data: &[u8]) -> Self {
        let path = self.dir.path().join(label).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Benign and malicious samples of differing sizes, including a nested one.
pub fn two_label_dataset() -> DatasetBuilder {
    DatasetBuilder::new()
        .sample("benign", "notepad.bin", &pattern(1000, 3))
        .sample("benign", "tiny.bin", b"abc")
        .sample("malicious", "dropper.bin", &pattern(4096, 7))
        .sample("malicious", "nested/stage2.bin", &pattern(77, 11))
}

/// Deterministic pseudo-random bytes.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    let mut state = seed as u32 | 1;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

pub fn config(toml: &str) -> RevealerConfig {
    RevealerConfig::from_toml_str(toml).unwrap()
}

pub fn sha256_id(data: &[u8]) -> ContentAddress {
    ContentAddress::of(data, DigestAlgorithm::Sha256)
}

pub fn read_record(out: &Path, label: &str, id: &ContentAddress) -> serde_json::Value {
    let path = out.join("json").join(label).join(format!("{}.json", id));
    serde_json::from_slice(&fs::read(&path).unwrap()).unwrap()
}

/// Every file under `root`, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}
