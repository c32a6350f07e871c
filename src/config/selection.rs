//! Ordered extractor selection.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Extractor group name -> ordered extractor names within that group.
///
/// Groups keep the order in which the configuration document lists them.
/// That order, followed by list order within each group, is the provider
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSelection {
    groups: Vec<(String, Vec<String>)>,
}

impl FeatureSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the names for `group`.
    ///
    /// A group that is already present keeps its position and has its names
    /// replaced; the previous names are returned.
    pub fn insert(&mut self, group: impl Into<String>, names: Vec<String>) -> Option<Vec<String>> {
        let group = group.into();
        match self.groups.iter_mut().find(|(g, _)| *g == group) {
            Some((_, existing)) => Some(std::mem::replace(existing, names)),
            None => {
                self.groups.push((group, names));
                None
            }
        }
    }

    pub fn get(&self, group: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(g, _)| g == group)
            .map(|(_, names)| names.as_slice())
    }

    /// Groups and their names in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(g, names)| (g.as_str(), names.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of (group, name) entries, duplicates included.
    pub fn requested_count(&self) -> usize {
        self.groups.iter().map(|(_, names)| names.len()).sum()
    }
}

impl FromIterator<(String, Vec<String>)> for FeatureSelection {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (group, names) in iter {
            selection.insert(group, names);
        }
        selection
    }
}

impl Serialize for FeatureSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, names) in &self.groups {
            map.serialize_entry(group, names)?;
        }
        map.end()
    }
}

struct SelectionVisitor;

impl<'de> Visitor<'de> for SelectionVisitor {
    type Value = FeatureSelection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of extractor groups to lists of extractor names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut selection = FeatureSelection::new();
        while let Some((group, names)) = access.next_entry::<String, Vec<String>>()? {
            selection.insert(group, names);
        }
        Ok(selection)
    }
}

impl<'de> Deserialize<'de> for FeatureSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SelectionVisitor)
    }
}
