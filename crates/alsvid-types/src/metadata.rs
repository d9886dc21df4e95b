//! Entry-point attribute and module-flag snapshots.
//!
//! Both are read once at load time and passed to the quantum backend's
//! `set_up` hook. Missing keys stay absent; nothing is defaulted.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// String attributes attached to the entry-point function of a QIR module.
///
/// Marker attributes such as `entry_point` are stored with an empty value.
/// Typed accessors cover the keys the QIR profile recognizes; everything
/// else is reachable through [`get`](Self::get) and iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointAttrs {
    attrs: FxHashMap<String, String>,
}

impl EntryPointAttrs {
    /// Build a snapshot from attribute key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EntryPointAttrs {
            attrs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The value of an attribute, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Whether the attribute is present (possibly with an empty value).
    pub fn contains(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Number of qubits the program requires, when declared.
    pub fn required_num_qubits(&self) -> Option<u64> {
        self.get("required_num_qubits").and_then(|v| v.parse().ok())
    }

    /// Number of result slots the program requires, when declared.
    pub fn required_num_results(&self) -> Option<u64> {
        self.get("required_num_results").and_then(|v| v.parse().ok())
    }

    /// The output labeling schema, when declared.
    pub fn output_labeling_schema(&self) -> Option<&str> {
        self.get("output_labeling_schema")
    }

    /// Iterate over all attribute key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of recorded attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the entry point carried no string attributes at all.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// The `qir_*` entries of a module's `!llvm.module.flags` metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFlags {
    /// Declared QIR major version.
    pub qir_major_version: Option<u32>,
    /// Declared QIR minor version.
    pub qir_minor_version: Option<u32>,
    /// Whether the program allocates qubits dynamically.
    pub dynamic_qubit_management: Option<bool>,
    /// Whether the program allocates result slots dynamically.
    pub dynamic_result_management: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_parse_decimal_values() {
        let attrs = EntryPointAttrs::from_pairs([
            ("entry_point", ""),
            ("required_num_qubits", "5"),
            ("required_num_results", "2"),
            ("output_labeling_schema", "schema_id"),
        ]);
        assert_eq!(attrs.required_num_qubits(), Some(5));
        assert_eq!(attrs.required_num_results(), Some(2));
        assert_eq!(attrs.output_labeling_schema(), Some("schema_id"));
        assert!(attrs.contains("entry_point"));
        assert_eq!(attrs.len(), 4);
    }

    #[test]
    fn missing_keys_stay_absent() {
        let attrs = EntryPointAttrs::default();
        assert!(attrs.is_empty());
        assert_eq!(attrs.required_num_qubits(), None);
        assert_eq!(attrs.get("output_labeling_schema"), None);

        let flags = ModuleFlags::default();
        assert_eq!(flags.qir_major_version, None);
        assert_eq!(flags.dynamic_qubit_management, None);
    }
}
