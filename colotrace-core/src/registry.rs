// Copyright 2025 Colotrace Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Entity registry
//!
//! Maps ARG/MGE labels to numeric IDs and IDs back to names, groups and
//! resistance metadata. The graph only ever stores IDs; reports ask the
//! registry for the human-readable side.
//!
//! [`StaticRegistry`] is the in-memory implementation, loaded from a JSON
//! document of the form:
//!
//! ```json
//! {
//!   "args": [{"id": 1, "label": "MEG_1", "group": "Aminoglycosides",
//!             "resistance": "Drugs", "requires_snp_confirmation": false}],
//!   "mges": [{"id": 10, "label": "tn916_1", "name": "Tn916", "group": "ICE"}]
//! }
//! ```

use crate::error::{ColotraceError, Result};
use crate::node::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name/ID resolution used by the builder and the reports
pub trait EntityRegistry {
    fn resolve_arg(&self, label: &str) -> Option<EntityId>;
    fn resolve_mge(&self, label: &str) -> Option<EntityId>;

    fn arg_name(&self, id: EntityId) -> Option<&str>;
    fn mge_name(&self, id: EntityId) -> Option<&str>;

    fn arg_group(&self, id: EntityId) -> Option<&str>;
    fn mge_group(&self, id: EntityId) -> Option<&str>;

    /// ARGs whose resistance stems from a point mutation. Unknown IDs: `false`.
    fn requires_snp_confirmation(&self, id: EntityId) -> bool;

    /// Resistance class (`Drugs`, `Metals`, `Biocides`, ...)
    fn arg_resistance(&self, id: EntityId) -> Option<&str>;

    /// Name for reports, falling back to the numeric ID
    fn arg_display(&self, id: EntityId) -> String {
        self.arg_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    fn mge_display(&self, id: EntityId) -> String {
        self.mge_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgEntry {
    pub id: EntityId,
    pub label: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub resistance: Option<String>,
    #[serde(default)]
    pub requires_snp_confirmation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgeEntry {
    pub id: EntityId,
    /// Label as it appears in the input table
    pub label: String,
    /// Display name; several labels may share one
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    args: Vec<ArgEntry>,
    #[serde(default)]
    mges: Vec<MgeEntry>,
}

/// In-memory registry
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    args: BTreeMap<EntityId, ArgEntry>,
    mges: BTreeMap<EntityId, MgeEntry>,
    arg_labels: HashMap<String, EntityId>,
    mge_labels: HashMap<String, EntityId>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry document (already read into memory)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: RegistryDocument = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for entry in doc.args {
            registry.insert_arg(entry)?;
        }
        for entry in doc.mges {
            registry.insert_mge(entry)?;
        }
        Ok(registry)
    }

    /// Rejects duplicate IDs and duplicate labels
    pub fn insert_arg(&mut self, entry: ArgEntry) -> Result<()> {
        if self.args.contains_key(&entry.id) {
            return Err(ColotraceError::Registry(format!("duplicate ARG id {}", entry.id)));
        }
        if self.arg_labels.contains_key(&entry.label) {
            return Err(ColotraceError::Registry(format!(
                "duplicate ARG label {}",
                entry.label
            )));
        }
        self.arg_labels.insert(entry.label.clone(), entry.id);
        self.args.insert(entry.id, entry);
        Ok(())
    }

    pub fn insert_mge(&mut self, entry: MgeEntry) -> Result<()> {
        if self.mges.contains_key(&entry.id) {
            return Err(ColotraceError::Registry(format!("duplicate MGE id {}", entry.id)));
        }
        if self.mge_labels.contains_key(&entry.label) {
            return Err(ColotraceError::Registry(format!(
                "duplicate MGE label {}",
                entry.label
            )));
        }
        self.mge_labels.insert(entry.label.clone(), entry.id);
        self.mges.insert(entry.id, entry);
        Ok(())
    }

    /// Convenience for tests and small fixtures: ARG with only a label
    pub fn with_arg(mut self, id: EntityId, label: &str) -> Result<Self> {
        self.insert_arg(ArgEntry {
            id,
            label: label.to_string(),
            group: None,
            resistance: None,
            requires_snp_confirmation: false,
        })?;
        Ok(self)
    }

    pub fn with_mge(mut self, id: EntityId, label: &str) -> Result<Self> {
        self.insert_mge(MgeEntry {
            id,
            label: label.to_string(),
            name: None,
            group: None,
        })?;
        Ok(self)
    }

    /// Resolve an MGE by display name rather than input label (first match by ID)
    pub fn resolve_mge_by_name(&self, name: &str) -> Option<EntityId> {
        self.mges
            .values()
            .find(|e| e.name.as_deref() == Some(name))
            .map(|e| e.id)
    }

    pub fn arg_entries(&self) -> impl Iterator<Item = &ArgEntry> + '_ {
        self.args.values()
    }

    pub fn mge_entries(&self) -> impl Iterator<Item = &MgeEntry> + '_ {
        self.mges.values()
    }

    pub fn len(&self) -> usize {
        self.args.len() + self.mges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.mges.is_empty()
    }
}

impl EntityRegistry for StaticRegistry {
    fn resolve_arg(&self, label: &str) -> Option<EntityId> {
        self.arg_labels.get(label).copied()
    }

    fn resolve_mge(&self, label: &str) -> Option<EntityId> {
        self.mge_labels.get(label).copied()
    }

    fn arg_name(&self, id: EntityId) -> Option<&str> {
        self.args.get(&id).map(|e| e.label.as_str())
    }

    fn mge_name(&self, id: EntityId) -> Option<&str> {
        self.mges
            .get(&id)
            .map(|e| e.name.as_deref().unwrap_or(e.label.as_str()))
    }

    fn arg_group(&self, id: EntityId) -> Option<&str> {
        self.args.get(&id).and_then(|e| e.group.as_deref())
    }

    fn mge_group(&self, id: EntityId) -> Option<&str> {
        self.mges.get(&id).and_then(|e| e.group.as_deref())
    }

    fn requires_snp_confirmation(&self, id: EntityId) -> bool {
        self.args
            .get(&id)
            .map(|e| e.requires_snp_confirmation)
            .unwrap_or(false)
    }

    fn arg_resistance(&self, id: EntityId) -> Option<&str> {
        self.args.get(&id).and_then(|e| e.resistance.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "args": [
            {"id": 1, "label": "MEG_1", "group": "Aminoglycosides", "resistance": "Drugs"},
            {"id": 2, "label": "MEG_2", "resistance": "Metals", "requires_snp_confirmation": true}
        ],
        "mges": [
            {"id": 10, "label": "tn916_1", "name": "Tn916", "group": "ICE"},
            {"id": 11, "label": "pUC_2"}
        ]
    }"#;

    #[test]
    fn test_load_and_resolve() {
        let registry = StaticRegistry::from_json_str(DOC).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.resolve_arg("MEG_1"), Some(1));
        assert_eq!(registry.resolve_arg("MEG_9"), None);
        assert_eq!(registry.resolve_mge("tn916_1"), Some(10));
        assert_eq!(registry.resolve_mge_by_name("Tn916"), Some(10));
    }

    #[test]
    fn test_metadata_lookups() {
        let registry = StaticRegistry::from_json_str(DOC).unwrap();
        assert_eq!(registry.arg_group(1), Some("Aminoglycosides"));
        assert_eq!(registry.arg_resistance(2), Some("Metals"));
        assert!(registry.requires_snp_confirmation(2));
        assert!(!registry.requires_snp_confirmation(1));
        assert!(!registry.requires_snp_confirmation(99));

        assert_eq!(registry.mge_name(10), Some("Tn916"));
        // No display name: the label stands in
        assert_eq!(registry.mge_name(11), Some("pUC_2"));
        assert_eq!(registry.mge_group(11), None);
        assert_eq!(registry.mge_display(42), "42");
    }

    #[test]
    fn test_duplicates_rejected() {
        let result = StaticRegistry::new()
            .with_arg(1, "MEG_1")
            .and_then(|r| r.with_arg(1, "MEG_X"));
        assert!(matches!(result, Err(ColotraceError::Registry(_))));

        let result = StaticRegistry::new()
            .with_mge(1, "a")
            .and_then(|r| r.with_mge(2, "a"));
        assert!(matches!(result, Err(ColotraceError::Registry(_))));
    }

    #[test]
    fn test_bad_json() {
        let result = StaticRegistry::from_json_str("{not json");
        assert!(matches!(result, Err(ColotraceError::Serialization(_))));
    }
}
