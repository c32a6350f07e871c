//! Per-sample extraction.
//!
//! [`extract_sample`] runs every provider over one sample and merges scalar
//! output; image artifacts are handed to a caller-supplied sink as soon as
//! they are produced. The batch engine persists through that sink, while
//! [`analyze_bytes`] collects them in memory with no filesystem effects.

use crate::hashing::{ContentAddress, DigestAlgorithm};
use crate::providers::{invoke, Extraction, FeatureMap, ImageArtifact, ProviderOutcome};
use crate::registry::ProviderSet;
use serde::Serialize;
use tracing::{debug, warn};

/// Summary of one provider invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProviderStatus {
    Extracted,
    Skipped { reason: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderReport {
    pub provider: String,
    #[serde(flatten)]
    pub status: ProviderStatus,
}

/// Merged scalar record plus one report per provider.
#[derive(Debug, Clone, Default)]
pub struct SampleExtraction {
    pub record: FeatureMap,
    pub outcomes: Vec<ProviderReport>,
}

impl SampleExtraction {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| matches!(r.status, ProviderStatus::Failed { .. }))
            .count()
    }

    pub fn skips(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| matches!(r.status, ProviderStatus::Skipped { .. }))
            .count()
    }
}

/// Runs all providers, in registration order, over one sample.
///
/// Scalar keys collide last-writer-wins. `on_image` receives the provider
/// name and artifact for every image produced.
pub fn extract_sample<F>(
    providers: &ProviderSet,
    id: &ContentAddress,
    data: &[u8],
    mut on_image: F,
) -> SampleExtraction
where
    F: FnMut(&str, ImageArtifact),
{
    let mut out = SampleExtraction::default();
    for entry in providers.iter() {
        let provider = entry.provider.as_ref();
        let status = match invoke(provider, data) {
            ProviderOutcome::Extracted(Extraction::Scalar(map)) => {
                for (key, value) in map {
                    if out.record.insert(key.clone(), value).is_some() {
                        debug!(provider = %entry.key, sample = %id.short(), key = %key, "Feature key overwritten");
                    }
                }
                ProviderStatus::Extracted
            }
            ProviderOutcome::Extracted(Extraction::Image(artifact)) => {
                on_image(provider.name(), artifact);
                ProviderStatus::Extracted
            }
            ProviderOutcome::Skipped(reason) => {
                debug!(provider = %entry.key, sample = %id.short(), reason = %reason, "Provider skipped");
                ProviderStatus::Skipped { reason }
            }
            ProviderOutcome::Failed(message) => {
                warn!(provider = %entry.key, sample = %id, error = %message, "Provider failed");
                ProviderStatus::Failed { message }
            }
        };
        out.outcomes.push(ProviderReport {
            provider: entry.key.clone(),
            status,
        });
    }
    out
}

/// An image artifact tagged with the provider that rendered it.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedImage {
    pub provider: String,
    pub artifact: ImageArtifact,
}

/// Everything extracted from one in-memory sample.
#[derive(Debug, Clone)]
pub struct SampleAnalysis {
    pub id: ContentAddress,
    pub record: FeatureMap,
    pub images: Vec<NamedImage>,
    pub outcomes: Vec<ProviderReport>,
}

/// Analyzes one sample without touching the filesystem.
pub fn analyze_bytes(
    data: &[u8],
    providers: &ProviderSet,
    algorithm: DigestAlgorithm,
) -> SampleAnalysis {
    let id = ContentAddress::of(data, algorithm);
    let mut images = Vec::new();
    let extraction = extract_sample(providers, &id, data, |provider, artifact| {
        images.push(NamedImage {
            provider: provider.to_string(),
            artifact,
        })
    });
    SampleAnalysis {
        id,
        record: extraction.record,
        images,
        outcomes: extraction.outcomes,
    }
}
