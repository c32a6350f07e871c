#![no_main]
use libfuzzer_sys::fuzz_target;
use revealer::providers::{invoke, ProviderOutcome, ProviderSettings};
use revealer::Registry;

fuzz_target!(|data: &[u8]| {
    let registry = Registry::with_builtins();
    let settings = ProviderSettings::default();
    let groups: Vec<String> = registry.groups().map(str::to_string).collect();
    let mut selection = revealer::FeatureSelection::new();
    for group in groups {
        let names = registry.names(&group).into_iter().map(str::to_string).collect();
        selection.insert(group, names);
    }
    let providers = registry.resolve(&selection, &settings);
    for entry in providers.iter() {
        // Panics inside a provider are reported, never propagated.
        if let ProviderOutcome::Failed(msg) = invoke(entry.provider.as_ref(), data) {
            assert!(!msg.is_empty());
        }
    }
});
