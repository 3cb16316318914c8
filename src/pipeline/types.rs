//! Executed-pipeline type definitions.
//!
//! These types are the capability interface over the host pipeline engine:
//! a step provides its identity, a class name, a human label, a summary,
//! and ordered input/output descriptors. The host's run export (see
//! [`crate::pipeline::parser`]) is the only way instances are created; once
//! parsed they are never mutated.

use serde::{Deserialize, Serialize};

/// A data port declared by an executed step.
///
/// The `id` is the linkage key: an input whose id matches an output id
/// somewhere in the run graph was fed by that output. The `class` names the
/// pipeline object type flowing through the port (e.g. `Volume`,
/// `SetOfParticles`) and drives ontology annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port identifier, unique within one step's input or output list.
    pub id: String,

    /// Pipeline object type name carried by this port.
    #[serde(rename = "class")]
    pub class_name: String,
}

/// One executed step of the source pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    /// Unique step id within the run graph.
    pub id: String,

    /// Step type name (the protocol class that ran).
    #[serde(rename = "class")]
    pub class_name: String,

    /// Human-readable label given by the operator.
    pub label: String,

    /// Summary text produced by the step after execution.
    pub summary: String,

    /// Ordered input ports.
    #[serde(default)]
    pub inputs: Vec<Port>,

    /// Ordered output ports.
    #[serde(default)]
    pub outputs: Vec<Port>,
}

impl PipelineStep {
    /// Composite class label: `<id>_<class>`.
    ///
    /// The id prefix keeps keys distinct when several steps share a type.
    pub fn class_label(&self) -> String {
        format!("{}_{}", self.id, self.class_name)
    }
}

/// An executed run graph: the ordered collection of steps the host engine
/// reports for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunGraph {
    pub steps: Vec<PipelineStep>,
}

impl RunGraph {
    /// Get a step by id.
    pub fn get_step(&self, id: &str) -> Option<&PipelineStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the graph has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_label() {
        let step = PipelineStep {
            id: "3".to_string(),
            class_name: "ProtImportMovies".to_string(),
            label: "import movies".to_string(),
            summary: "imported 24 movies".to_string(),
            inputs: vec![],
            outputs: vec![],
        };
        assert_eq!(step.class_label(), "3_ProtImportMovies");
    }

    #[test]
    fn test_get_step() {
        let graph = RunGraph {
            steps: vec![PipelineStep {
                id: "1".to_string(),
                class_name: "ProtCTFFind".to_string(),
                label: "ctffind".to_string(),
                summary: "estimated CTF".to_string(),
                inputs: vec![],
                outputs: vec![],
            }],
        };
        assert!(graph.get_step("1").is_some());
        assert!(graph.get_step("2").is_none());
        assert_eq!(graph.len(), 1);
    }
}
