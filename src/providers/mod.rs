//! Feature provider contract.
//!
//! Every extractor implements [`FeatureProvider`] and declares up front
//! whether it produces a scalar feature map or a rendered image. The engine
//! dispatches on that tag; [`invoke`] is the single fault boundary around a
//! provider call and turns every failure mode into a [`ProviderOutcome`].

pub mod base;
pub mod elf;
pub mod image;
pub mod pe;

use crate::error::{Result, RevealerError};
use ::image::{GrayImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Aggregated key/value features for one sample.
pub type FeatureMap = serde_json::Map<String, serde_json::Value>;

/// Declared output kind of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Scalar,
    Image,
}

/// Encoding used when persisting an image artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    #[default]
    Png,
    Bmp,
}

impl ImageEncoding {
    /// File extension, also used as the format suffix in the image tree.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "png",
            ImageEncoding::Bmp => "bmp",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            ImageEncoding::Png => ImageFormat::Png,
            ImageEncoding::Bmp => ImageFormat::Bmp,
        }
    }
}

/// A rendered image plus the encoding it is meant to be stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArtifact {
    pub image: GrayImage,
    pub encoding: ImageEncoding,
}

impl ImageArtifact {
    pub fn new(image: GrayImage, encoding: ImageEncoding) -> Self {
        Self { image, encoding }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Encodes the image in memory.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, self.encoding.image_format())?;
        Ok(buf.into_inner())
    }

    /// Encodes and writes the image to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.encode()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Successful result of one provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Scalar(FeatureMap),
    Image(ImageArtifact),
}

impl Extraction {
    pub fn kind(&self) -> OutputKind {
        match self {
            Extraction::Scalar(_) => OutputKind::Scalar,
            Extraction::Image(_) => OutputKind::Image,
        }
    }
}

/// Construction-time settings shared by the built-in providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Encoding for image providers.
    pub image_format: ImageEncoding,
    /// Window size for windowed entropy statistics.
    pub entropy_window: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            image_format: ImageEncoding::Png,
            entropy_window: 256,
        }
    }
}

/// Capability interface implemented by every extractor.
///
/// Implementations hold only construction-time configuration and must not
/// carry state from one sample to the next.
pub trait FeatureProvider: Send + Sync {
    /// Stable provider name; names the provider's image directory.
    fn name(&self) -> &str;

    /// Output kind this provider produces.
    fn kind(&self) -> OutputKind;

    /// Cheap compatibility check run before `extract`.
    fn can_extract(&self, _data: &[u8]) -> bool {
        true
    }

    /// Extracts features from raw sample bytes. May fail on malformed input.
    fn extract(&self, data: &[u8]) -> Result<Extraction>;
}

/// Result of one guarded provider invocation.
#[derive(Debug)]
pub enum ProviderOutcome {
    Extracted(Extraction),
    /// `can_extract` refused the sample or the format collaborator reported absence.
    Skipped(String),
    Failed(String),
}

/// Runs `provider` on `data` inside the fault boundary.
///
/// Never panics: a panicking provider is reported as `Failed`, as is a
/// provider whose output does not match its declared kind.
pub fn invoke(provider: &dyn FeatureProvider, data: &[u8]) -> ProviderOutcome {
    let guarded = panic::catch_unwind(AssertUnwindSafe(|| {
        if !provider.can_extract(data) {
            return ProviderOutcome::Skipped("compatibility check declined".to_string());
        }
        match provider.extract(data) {
            Ok(extraction) if extraction.kind() == provider.kind() => {
                ProviderOutcome::Extracted(extraction)
            }
            Ok(extraction) => ProviderOutcome::Failed(format!(
                "declared {:?} output but produced {:?}",
                provider.kind(),
                extraction.kind()
            )),
            Err(RevealerError::UnsupportedFormat(msg)) => ProviderOutcome::Skipped(msg),
            Err(e) => ProviderOutcome::Failed(e.to_string()),
        }
    }));

    guarded.unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        ProviderOutcome::Failed(format!("panicked: {}", msg))
    })
}

/// Wraps a feature map as a scalar extraction.
pub(crate) fn scalar(map: FeatureMap) -> Result<Extraction> {
    Ok(Extraction::Scalar(map))
}
