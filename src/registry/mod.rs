//! Provider registry.
//!
//! An explicit registration table keyed by `(group, name)`, populated before
//! any extraction starts. Resolving a feature selection instantiates the
//! requested providers; entries that cannot be resolved are logged and
//! skipped, so the resolved set may be smaller than the request.

use crate::config::FeatureSelection;
use crate::providers::{base, elf, image, pe, FeatureProvider, OutputKind, ProviderSettings};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Builds a provider from the run's provider settings.
pub type ProviderFactory = Box<dyn Fn(&ProviderSettings) -> Box<dyn FeatureProvider> + Send + Sync>;

/// Registration table of provider factories.
#[derive(Default)]
pub struct Registry {
    groups: BTreeMap<String, BTreeMap<String, ProviderFactory>>,
    // group -> alternate name -> registered name
    aliases: BTreeMap<String, BTreeMap<String, String>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in provider.
    ///
    /// The header and library extractors also answer to the class-style
    /// names used by older configuration files (`ELFHeader`,
    /// `ELFLibraries`, `MSDOS_Header`, `PE_Header`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("base", "ByteHistogram", |_| Box::new(base::ByteHistogram));
        registry.register("base", "FileSize", |_| Box::new(base::FileSize));
        registry.register("base", "FileType", |_| Box::new(base::FileType));
        registry.register("base", "ByteEntropy", |s| {
            Box::new(base::ByteEntropy::new(s.entropy_window))
        });
        registry.register("elf", "ElfHeader", |_| Box::new(elf::ElfHeader));
        registry.register("elf", "Sections", |_| Box::new(elf::Sections));
        registry.register("elf", "ElfLibraries", |_| Box::new(elf::ElfLibraries));
        registry.register("pe", "GeneralFileInfo", |_| Box::new(pe::GeneralFileInfo));
        registry.register("pe", "MsDosHeader", |_| Box::new(pe::MsDosHeader));
        registry.register("pe", "PeHeader", |_| Box::new(pe::PeHeader));
        registry.register("image", "Grayscale", |s| {
            Box::new(image::Grayscale::new(s.image_format))
        });

        registry.alias("elf", "ELFHeader", "ElfHeader");
        registry.alias("elf", "ELFLibraries", "ElfLibraries");
        registry.alias("pe", "MSDOS_Header", "MsDosHeader");
        registry.alias("pe", "PE_Header", "PeHeader");
        registry
    }

    /// Adds or replaces the factory for `(group, name)`.
    pub fn register<F>(&mut self, group: &str, name: &str, factory: F)
    where
        F: Fn(&ProviderSettings) -> Box<dyn FeatureProvider> + Send + Sync + 'static,
    {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), Box::new(factory));
    }

    /// Makes `alias` resolve to the provider registered as `(group, name)`.
    ///
    /// Providers resolved through an alias are keyed by the registered name,
    /// so listing both names still yields one provider.
    pub fn alias(&mut self, group: &str, alias: &str, name: &str) {
        self.aliases
            .entry(group.to_string())
            .or_default()
            .insert(alias.to_string(), name.to_string());
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Registered names in `group`, aliases excluded.
    pub fn names(&self, group: &str) -> Vec<&str> {
        self.groups
            .get(group)
            .map(|g| g.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, group: &str, name: &str) -> bool {
        let name = self.canonical(group, name);
        self.groups
            .get(group)
            .is_some_and(|g| g.contains_key(name))
    }

    fn canonical<'a>(&'a self, group: &str, name: &'a str) -> &'a str {
        self.aliases
            .get(group)
            .and_then(|a| a.get(name))
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Instantiates the providers named by `selection`, groups in document
    /// order and names in list order.
    pub fn resolve(&self, selection: &FeatureSelection, settings: &ProviderSettings) -> ProviderSet {
        let mut set = ProviderSet::new();
        for (group, names) in selection.iter() {
            let Some(factories) = self.groups.get(group) else {
                warn!(group = %group, "Unknown extractor group; skipping its entries");
                continue;
            };
            for requested in names {
                let name = self.canonical(group, requested);
                let Some(factory) = factories.get(name) else {
                    warn!(group = %group, name = %requested, "Unknown extractor; skipping");
                    continue;
                };
                if name != requested.as_str() {
                    debug!(group = %group, alias = %requested, name = %name, "Resolved extractor alias");
                }
                let key = format!("{}.{}", group, name);
                if set.get(&key).is_some() {
                    debug!(provider = %key, "Extractor listed twice; keeping first");
                    continue;
                }
                set.push(key, factory(settings));
            }
        }
        info!(
            requested = selection.requested_count(),
            resolved = set.len(),
            "Resolved extractors"
        );
        set
    }
}

/// One instantiated provider and the qualified key it was resolved under.
pub struct RegisteredProvider {
    pub key: String,
    pub provider: Box<dyn FeatureProvider>,
}

/// Ordered, key-addressable set of instantiated providers.
///
/// Iteration order is registration order, which decides scalar key
/// collisions (the later provider wins).
#[derive(Default)]
pub struct ProviderSet {
    entries: Vec<RegisteredProvider>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider under `key`.
    pub fn push(&mut self, key: impl Into<String>, provider: Box<dyn FeatureProvider>) {
        self.entries.push(RegisteredProvider {
            key: key.into(),
            provider,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&dyn FeatureProvider> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.provider.as_ref())
    }

    /// Distinct provider names of image producers, in registration order.
    pub fn image_provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            if entry.provider.kind() == OutputKind::Image {
                let name = entry.provider.name().to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
