//! Output directory layout.
//!
//! Two parallel trees under one output root:
//!
//! - `json/<label>/<sample_id>.json`
//! - `image/<provider>/<label>/<sample_id>.<format>`
//!
//! This module only guarantees directory existence and builds paths; it never
//! serializes anything.

use crate::error::Result;
use crate::hashing::ContentAddress;
use crate::providers::ImageEncoding;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STRUCTURED_DIR: &str = "json";
pub const IMAGE_DIR: &str = "image";
pub const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    structured_root: PathBuf,
    image_root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            structured_root: root.join(STRUCTURED_DIR),
            image_root: root.join(IMAGE_DIR),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn structured_root(&self) -> &Path {
        &self.structured_root
    }

    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    /// Directories that must exist before any sample is written.
    ///
    /// The image tree is only included when there is at least one image
    /// provider.
    pub fn required_dirs(&self, labels: &[String], image_providers: &[String]) -> Vec<PathBuf> {
        let mut dirs = vec![self.structured_root.clone()];
        dirs.extend(labels.iter().map(|l| self.structured_root.join(l)));
        for provider in image_providers {
            for label in labels {
                dirs.push(self.image_root.join(provider).join(label));
            }
        }
        dirs
    }

    /// Creates every required directory. Existing directories are untouched.
    pub fn prepare(&self, labels: &[String], image_providers: &[String]) -> Result<()> {
        for dir in self.required_dirs(labels, image_providers) {
            fs::create_dir_all(&dir)?;
            debug!(dir = %dir.display(), "Output directory ready");
        }
        Ok(())
    }

    /// Required directories that are currently missing.
    pub fn validate(&self, labels: &[String], image_providers: &[String]) -> Vec<PathBuf> {
        self.required_dirs(labels, image_providers)
            .into_iter()
            .filter(|d| !d.is_dir())
            .collect()
    }

    pub fn record_path(&self, label: &str, id: &ContentAddress) -> PathBuf {
        self.structured_root
            .join(label)
            .join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    pub fn image_path(
        &self,
        provider: &str,
        label: &str,
        id: &ContentAddress,
        encoding: ImageEncoding,
    ) -> PathBuf {
        self.image_root
            .join(provider)
            .join(label)
            .join(format!("{}.{}", id, encoding.extension()))
    }
}
