//! Core domain types: discovered components and the usage index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A visual component, named after its definition file's stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// PascalCase identifier, e.g. `UiButton`.
    pub name: String,
    /// Definition file the name was derived from.
    pub definition: PathBuf,
}

impl Component {
    /// Derive a component from its definition file. Returns `None` for paths without a stem.
    pub fn from_definition(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?;
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            definition: path.to_path_buf(),
        })
    }
}

// ---------------------------------------------------------------------------
// UsageIndex
// ---------------------------------------------------------------------------

/// Component name → files referencing it.
///
/// Keys keep first-insertion order and each path list is duplicate-free in
/// discovery order. Components without usages never appear as keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIndex {
    entries: Vec<(String, Vec<String>)>,
    /// Component name → position in `entries`.
    positions: HashMap<String, usize>,
}

impl UsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` references `component`. Returns `false` if already recorded.
    pub fn record(&mut self, component: &str, path: String) -> bool {
        match self.positions.get(component) {
            Some(&i) => {
                let paths = &mut self.entries[i].1;
                if paths.contains(&path) {
                    return false;
                }
                paths.push(path);
                true
            }
            None => {
                self.positions
                    .insert(component.to_string(), self.entries.len());
                self.entries.push((component.to_string(), vec![path]));
                true
            }
        }
    }

    /// Usages of `component`, empty when it has none.
    pub fn usages(&self, component: &str) -> &[String] {
        self.positions
            .get(component)
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or_default()
    }

    pub fn contains(&self, component: &str) -> bool {
        self.positions.contains_key(component)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(component, paths)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, paths)| (name.as_str(), paths.as_slice()))
    }

    /// Pretty-printed JSON object `{ "<component>": ["./path", ...] }`.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for UsageIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, paths) in &self.entries {
            map.serialize_entry(name, paths)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_name_is_file_stem() {
        let c = Component::from_definition(Path::new("/app/src/components/UiButton/UiButton.vue"))
            .unwrap();
        assert_eq!(c.name, "UiButton");
        assert!(Component::from_definition(Path::new("/")).is_none());
    }

    #[test]
    fn record_suppresses_duplicates() {
        let mut index = UsageIndex::new();
        assert!(index.record("Btn", "./App.vue".into()));
        assert!(!index.record("Btn", "./App.vue".into()));
        assert!(index.record("Btn", "./Page.vue".into()));
        assert!(index.record("Card", "./App.vue".into()));

        assert_eq!(index.usages("Btn"), ["./App.vue", "./Page.vue"]);
        assert_eq!(index.usages("Card"), ["./App.vue"]);
        assert!(index.usages("Missing").is_empty());
        assert!(!index.contains("Missing"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn lookups_stay_consistent_across_many_components() {
        let mut index = UsageIndex::new();
        for i in 0..200 {
            index.record(&format!("C{i}"), format!("./f{i}.vue"));
        }
        index.record("C7", "./extra.vue".into());

        assert_eq!(index.len(), 200);
        assert_eq!(index.usages("C7"), ["./f7.vue", "./extra.vue"]);
        assert_eq!(index.usages("C199"), ["./f199.vue"]);
        assert_eq!(index.iter().next().map(|(name, _)| name), Some("C0"));
    }

    #[test]
    fn json_keeps_insertion_order() {
        let mut index = UsageIndex::new();
        index.record("Zeta", "./a.vue".into());
        index.record("Alpha", "./b.vue".into());

        let json = index.to_json_pretty().unwrap();
        assert_eq!(
            json,
            "{\n  \"Zeta\": [\n    \"./a.vue\"\n  ],\n  \"Alpha\": [\n    \"./b.vue\"\n  ]\n}"
        );
    }
}
