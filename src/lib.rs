//! revealer: feature extraction over labeled corpora of executable samples.
//!
//! A run walks a dataset root whose first-level directories are labels,
//! applies the configured feature providers to every sample and persists one
//! JSON record per sample plus one rendering per image provider, all keyed by
//! the sample's content address.

/// Run configuration (TOML or JSON)
pub mod config;
/// Labeled dataset discovery
pub mod dataset;
/// Batch orchestration and run reports
pub mod engine;
pub mod entropy;
/// Error types
pub mod error;
/// Executable format detection and parsing
pub mod formats;
/// Content addressing
pub mod hashing;
/// Bounded sample reads
pub mod io;
/// Output directory layout
pub mod layout;
/// Logging and tracing infrastructure
pub mod logging;
/// Provider contract and built-in providers
pub mod providers;
/// Provider registration and resolution
pub mod registry;
/// Single-sample extraction
pub mod service;

pub use config::{FeatureSelection, RevealerConfig};
pub use dataset::Dataset;
pub use engine::{EngineConfig, ExtractionEngine, RunReport};
pub use error::{Result, RevealerError};
pub use hashing::{ContentAddress, DigestAlgorithm};
pub use layout::OutputLayout;
pub use providers::{Extraction, FeatureProvider, ImageArtifact, OutputKind, ProviderOutcome};
pub use registry::{ProviderSet, Registry};
pub use service::{analyze_bytes, SampleAnalysis};
