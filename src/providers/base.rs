//! Format-independent providers.
//!
//! These work on any byte sequence, so they never decline a sample.

use super::{scalar, Extraction, FeatureMap, FeatureProvider, OutputKind};
use crate::entropy::{window_summary, Histogram};
use crate::error::Result;
use serde_json::{json, Value};

/// Counts of each byte value (256 buckets).
#[derive(Debug, Default)]
pub struct ByteHistogram;

impl FeatureProvider for ByteHistogram {
    fn name(&self) -> &str {
        "byte_histogram"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let hist = Histogram::from_bytes(data);
        let mut map = FeatureMap::new();
        map.insert(
            "byte_histogram".into(),
            Value::Array(hist.counts().iter().map(|&c| json!(c)).collect()),
        );
        scalar(map)
    }
}

/// Raw sample length in bytes.
#[derive(Debug, Default)]
pub struct FileSize;

impl FeatureProvider for FileSize {
    fn name(&self) -> &str {
        "file_size"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let mut map = FeatureMap::new();
        map.insert("size".into(), json!(data.len()));
        scalar(map)
    }
}

/// Overall and windowed Shannon entropy.
#[derive(Debug)]
pub struct ByteEntropy {
    window: usize,
}

impl ByteEntropy {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl FeatureProvider for ByteEntropy {
    fn name(&self) -> &str {
        "byte_entropy"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let summary = window_summary(data, self.window);
        let mut map = FeatureMap::new();
        map.insert("entropy".into(), serde_json::to_value(summary)?);
        scalar(map)
    }
}

/// Content-sniffed MIME type and extension; null when unrecognized.
#[derive(Debug, Default)]
pub struct FileType;

impl FeatureProvider for FileType {
    fn name(&self) -> &str {
        "file_type"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let value = match infer::get(data) {
            Some(kind) => json!({
                "mime": kind.mime_type(),
                "extension": kind.extension(),
            }),
            None => json!({ "mime": Value::Null, "extension": Value::Null }),
        };
        let mut map = FeatureMap::new();
        map.insert("file_type".into(), value);
        scalar(map)
    }
}
