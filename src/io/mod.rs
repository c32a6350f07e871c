//! Bounded sample I/O.
//!
//! Samples are memory-mapped and copied into a `Bytes` buffer once. A size
//! ceiling keeps a single oversized file from exhausting memory mid-run.

use crate::error::{Result, RevealerError};
use bytes::Bytes;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Defines the resource limits for sample reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoLimits {
    /// The absolute maximum sample size that will be read.
    pub max_file_size: u64,
}

impl Default for IoLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// A bounded, memory-mapped file reader.
pub struct SafeReader {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    file_size: u64,
}

impl SafeReader {
    /// Opens and maps a file, failing when it exceeds `limits.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, limits: &IoLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size > limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "File is too large"
            );
            return Err(RevealerError::FileTooLarge {
                limit: limits.max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: read-only map of a regular file; the buffer is copied out
            // before the map is dropped.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            file_size,
        })
    }

    /// Returns the total size of the underlying file in bytes.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Copies the whole file into an owned buffer.
    pub fn read_all(&self) -> Bytes {
        let out = match &self.mmap {
            Some(map) => Bytes::copy_from_slice(&map[..]),
            None => Bytes::new(),
        };
        trace!(path = %self.path.display(), len = out.len(), "Read sample");
        out
    }
}

/// Reads one sample under the given limits.
pub fn read_sample<P: AsRef<Path>>(path: P, limits: &IoLimits) -> Result<Bytes> {
    Ok(SafeReader::open(path, limits)?.read_all())
}
