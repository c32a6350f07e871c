//! Dataset discovery.
//!
//! The dataset root's immediate subdirectories are labels. Every regular file
//! anywhere beneath a label directory is a sample. Loose files at the root
//! are ignored and symlinks are not followed.

use crate::error::{Result, RevealerError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One label partition of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub path: PathBuf,
}

/// A sample file awaiting extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRef {
    pub label: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    root: PathBuf,
    labels: Vec<Label>,
}

impl Dataset {
    /// Opens a dataset root and lists its labels.
    ///
    /// Fails when the root is missing, is not a directory or cannot be read;
    /// these are startup errors.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let unusable = |reason: String| RevealerError::DatasetRoot {
            path: root.to_path_buf(),
            reason,
        };

        if !root.exists() {
            return Err(unusable("does not exist".to_string()));
        }
        if !root.is_dir() {
            return Err(unusable("is not a directory".to_string()));
        }
        let entries = fs::read_dir(root).map_err(|e| unusable(e.to_string()))?;

        let mut labels = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "Unreadable dataset entry");
                    continue;
                }
            };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                debug!(path = %entry.path().display(), "Ignoring non-directory at dataset root");
                continue;
            }
            labels.push(Label {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }
        labels.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            root: root.to_path_buf(),
            labels,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    /// Samples under one label, sorted by path.
    pub fn samples_in(&self, label: &Label) -> Vec<SampleRef> {
        let mut samples = Vec::new();
        let walker = WalkDir::new(&label.path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(label = %label.name, error = %err, "Scan error; continuing");
                    continue;
                }
            };
            if entry.file_type().is_file() {
                samples.push(SampleRef {
                    label: label.name.clone(),
                    path: entry.into_path(),
                });
            }
        }
        samples
    }

    /// All samples, label by label.
    pub fn samples(&self) -> Vec<SampleRef> {
        self.labels.iter().flat_map(|l| self.samples_in(l)).collect()
    }
}
