//! Batch extraction over a labeled dataset.
//!
//! A run prepares the output tree, then handles each sample end-to-end:
//! read, address, extract, write images, write the merged record. Errors
//! scoped to one sample or one provider are logged and counted; only
//! startup errors are returned.

use crate::config::RevealerConfig;
use crate::dataset::{Dataset, SampleRef};
use crate::error::{Result, RevealerError};
use crate::hashing::{ContentAddress, DigestAlgorithm};
use crate::io::{read_sample, IoLimits};
use crate::layout::OutputLayout;
use crate::registry::{ProviderSet, Registry};
use crate::service::extract_sample;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples processed concurrently. 1 means sequential.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Counters for one sample, summed into the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    samples: usize,
    records_written: usize,
    images_written: usize,
    provider_failures: usize,
    provider_skips: usize,
    read_failures: usize,
    persist_failures: usize,
}

impl Tally {
    fn merge(self, other: Tally) -> Tally {
        Tally {
            samples: self.samples + other.samples,
            records_written: self.records_written + other.records_written,
            images_written: self.images_written + other.images_written,
            provider_failures: self.provider_failures + other.provider_failures,
            provider_skips: self.provider_skips + other.provider_skips,
            read_failures: self.read_failures + other.read_failures,
            persist_failures: self.persist_failures + other.persist_failures,
        }
    }
}

/// Summary of a completed batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub labels: usize,
    pub samples: usize,
    pub records_written: usize,
    pub images_written: usize,
    pub provider_failures: usize,
    pub provider_skips: usize,
    pub read_failures: usize,
    pub persist_failures: usize,
}

impl RunReport {
    /// True when every sample was read and every output persisted.
    pub fn is_clean(&self) -> bool {
        self.read_failures == 0 && self.persist_failures == 0
    }
}

/// Drives a provider set over a dataset into an output layout.
pub struct ExtractionEngine {
    providers: ProviderSet,
    layout: OutputLayout,
    digest: DigestAlgorithm,
    limits: IoLimits,
    workers: usize,
}

impl ExtractionEngine {
    pub fn new(providers: ProviderSet, layout: OutputLayout) -> Self {
        Self {
            providers,
            layout,
            digest: DigestAlgorithm::default(),
            limits: IoLimits::default(),
            workers: EngineConfig::default().workers,
        }
    }

    /// Builds an engine from a validated configuration.
    pub fn from_config<P: AsRef<Path>>(
        config: &RevealerConfig,
        registry: &Registry,
        output_root: P,
    ) -> Result<Self> {
        config.validate()?;
        let providers = registry.resolve(&config.features, &config.providers);
        Ok(Self::new(providers, OutputLayout::new(output_root))
            .with_digest(config.digest)
            .with_limits(config.io.clone())
            .with_workers(config.engine.workers))
    }

    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    pub fn with_limits(mut self, limits: IoLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the worker count; zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Creates the structured and image directories for every label.
    pub fn prepare(&self, dataset: &Dataset) -> Result<()> {
        let labels = dataset.label_names();
        let image_providers = self.providers.image_provider_names();
        self.layout.prepare(&labels, &image_providers)?;
        info!(
            root = %self.layout.root().display(),
            labels = labels.len(),
            image_providers = image_providers.len(),
            "Output layout prepared"
        );
        Ok(())
    }

    /// Runs every provider over every sample of `dataset`.
    pub fn run(&self, dataset: &Dataset) -> Result<RunReport> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let span = info_span!("run", dataset = %dataset.root().display(), workers = self.workers);
        let _g = span.enter();

        if self.providers.is_empty() {
            warn!("No extractors resolved; records will be empty");
        }
        self.prepare(dataset)?;

        let samples = dataset.samples();
        info!(samples = samples.len(), "Starting extraction");

        let tally = if self.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .map_err(|e| RevealerError::Config(format!("worker pool: {}", e)))?;
            pool.install(|| {
                samples
                    .par_iter()
                    .map(|sample| self.process_sample(sample))
                    .reduce(Tally::default, Tally::merge)
            })
        } else {
            samples
                .iter()
                .map(|sample| self.process_sample(sample))
                .fold(Tally::default(), Tally::merge)
        };

        let report = RunReport {
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
            labels: dataset.labels().len(),
            samples: tally.samples,
            records_written: tally.records_written,
            images_written: tally.images_written,
            provider_failures: tally.provider_failures,
            provider_skips: tally.provider_skips,
            read_failures: tally.read_failures,
            persist_failures: tally.persist_failures,
        };
        info!(
            samples = report.samples,
            records = report.records_written,
            images = report.images_written,
            failures = report.provider_failures,
            duration_ms = report.duration_ms,
            "Extraction finished"
        );
        Ok(report)
    }

    fn process_sample(&self, sample: &SampleRef) -> Tally {
        let mut tally = Tally {
            samples: 1,
            ..Tally::default()
        };

        let data = match read_sample(&sample.path, &self.limits) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %sample.path.display(), label = %sample.label, error = %err, "Sample unreadable, skipping");
                tally.read_failures = 1;
                return tally;
            }
        };
        let id = ContentAddress::of(&data, self.digest);
        let span = info_span!("sample", sample = %id.short(), label = %sample.label);
        let _g = span.enter();
        debug!(path = %sample.path.display(), size = data.len(), "Processing sample");

        let extraction = extract_sample(&self.providers, &id, &data, |provider, artifact| {
            let path = self
                .layout
                .image_path(provider, &sample.label, &id, artifact.encoding);
            match artifact.save(&path) {
                Ok(()) => tally.images_written += 1,
                Err(err) => {
                    error!(provider, path = %path.display(), error = %err, "Image write failed");
                    tally.persist_failures += 1;
                }
            }
        });
        tally.provider_failures = extraction.failures();
        tally.provider_skips = extraction.skips();

        let path = self.layout.record_path(&sample.label, &id);
        let written = serde_json::to_vec_pretty(&extraction.record)
            .map_err(RevealerError::from)
            .and_then(|bytes| fs::write(&path, bytes).map_err(RevealerError::from));
        match written {
            Ok(()) => tally.records_written = 1,
            Err(err) => {
                error!(path = %path.display(), error = %err, "Record write failed");
                tally.persist_failures += 1;
            }
        }
        tally
    }
}

impl std::fmt::Debug for ExtractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionEngine")
            .field("providers", &self.providers)
            .field("root", &self.layout.root())
            .field("digest", &self.digest)
            .field("workers", &self.workers)
            .finish()
    }
}
