//! CWL workflow document model.
//!
//! The emitted document is a CWL v1.1 `Workflow` whose steps carry all the
//! data flow; top-level `inputs` and `outputs` stay empty. Field order in
//! these structs is the serialization order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// CWL version the emitter targets.
pub const CWL_VERSION: &str = "v1.1";

/// Document class marker.
pub const WORKFLOW_CLASS: &str = "Workflow";

/// Run-spec class marker. The run spec only describes what ran; the base
/// command is always empty because re-invocation is out of scope.
pub const RUN_CLASS: &str = "CommandLineTool";

/// A keyed CWL collection.
///
/// The enclosing format distinguishes "no entries" (an empty sequence) from
/// "entries present" (a mapping), so both shapes are modelled. Untagged
/// deserialization tries the sequence first; a mapping falls through to
/// `Entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CwlMap<T> {
    Empty(Vec<serde_yaml::Value>),
    Entries(IndexMap<String, T>),
}

impl<T> CwlMap<T> {
    /// The empty shape, rendered as `[]`.
    pub fn empty() -> Self {
        CwlMap::Empty(Vec::new())
    }

    /// Build from entries, collapsing to the empty shape when there are none.
    pub fn from_entries(entries: IndexMap<String, T>) -> Self {
        if entries.is_empty() {
            Self::empty()
        } else {
            CwlMap::Entries(entries)
        }
    }

    /// Entry count (zero for the empty shape).
    pub fn len(&self) -> usize {
        match self {
            CwlMap::Empty(_) => 0,
            CwlMap::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry lookup; always `None` for the empty shape.
    pub fn get(&self, key: &str) -> Option<&T> {
        match self {
            CwlMap::Empty(_) => None,
            CwlMap::Entries(entries) => entries.get(key),
        }
    }
}

/// A step's `in` entry: where the port's data came from.
///
/// `source` is omitted when the linkage pass found no producing output —
/// the input came from outside the captured pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A typed port in a step's run spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    #[serde(rename = "type")]
    pub port_type: String,
    pub format: String,
}

/// The run spec of one step: what ran, with typed ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub class: String,
    #[serde(rename = "baseCommand")]
    pub base_command: Vec<String>,
    pub inputs: CwlMap<PortSpec>,
    pub outputs: CwlMap<PortSpec>,
}

/// One workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub label: String,
    pub doc: String,
    pub run: RunSpec,
    /// Output ids, always a flat list.
    pub out: Vec<String>,
    #[serde(rename = "in")]
    pub inputs: CwlMap<StepInput>,
}

/// The emitted workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(rename = "cwlVersion")]
    pub cwl_version: String,
    pub class: String,
    pub label: String,
    pub doc: String,
    /// Always empty: all data flows through step-level ports.
    pub inputs: Vec<serde_yaml::Value>,
    /// Always empty, as above.
    pub outputs: Vec<serde_yaml::Value>,
    /// Steps keyed by composite class label, in run-export order.
    pub steps: CwlMap<WorkflowStep>,
    #[serde(rename = "$namespaces")]
    pub namespaces: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_serializes_as_sequence() {
        let map: CwlMap<PortSpec> = CwlMap::empty();
        let yaml = serde_yaml::to_string(&map).unwrap();
        assert_eq!(yaml.trim(), "[]");
    }

    #[test]
    fn test_populated_map_serializes_as_mapping() {
        let mut entries = IndexMap::new();
        entries.insert(
            "vol".to_string(),
            PortSpec {
                port_type: "File".to_string(),
                format: "cryoem:CRYOEM_0000075".to_string(),
            },
        );
        let map = CwlMap::from_entries(entries);
        let yaml = serde_yaml::to_string(&map).unwrap();
        assert!(yaml.contains("vol:"));
        assert!(yaml.contains("type: File"));
        assert!(yaml.contains("format: cryoem:CRYOEM_0000075"));
    }

    #[test]
    fn test_map_roundtrip_keeps_shape() {
        let empty: CwlMap<StepInput> = CwlMap::empty();
        let parsed: CwlMap<StepInput> =
            serde_yaml::from_str(&serde_yaml::to_string(&empty).unwrap()).unwrap();
        assert_eq!(parsed, empty);

        let mut entries = IndexMap::new();
        entries.insert(
            "vol".to_string(),
            StepInput {
                source: Some("1_ProtImportVolumes/vol".to_string()),
            },
        );
        let populated = CwlMap::from_entries(entries);
        let parsed: CwlMap<StepInput> =
            serde_yaml::from_str(&serde_yaml::to_string(&populated).unwrap()).unwrap();
        assert_eq!(parsed, populated);
    }

    #[test]
    fn test_from_entries_collapses_empty_to_sequence() {
        let map: CwlMap<StepInput> = CwlMap::from_entries(IndexMap::new());
        assert_eq!(map, CwlMap::empty());
    }

    #[test]
    fn test_unresolved_source_is_omitted() {
        let input = StepInput { source: None };
        let yaml = serde_yaml::to_string(&input).unwrap();
        assert!(!yaml.contains("source"));

        let parsed: StepInput = serde_yaml::from_str("{}").unwrap();
        assert_eq!(parsed.source, None);
    }
}
