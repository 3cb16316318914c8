//! Run-graph translation.
//!
//! Reshapes the host's executed run graph into the normalized step mapping
//! the CWL emitter consumes: one record per step, keyed by step id, with
//! each input linked back to the output that produced it.

use indexmap::IndexMap;

use super::types::{Port, RunGraph};

/// An input port after the linkage pass.
///
/// `source` stays `None` when no output in the whole graph matches the
/// input's id. That is a valid terminal state, not an error: the input came
/// from outside the captured pipeline (e.g. an imported file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedInput {
    pub id: String,
    pub class_name: String,
    pub source: Option<String>,
}

/// Normalized step record: one per executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Composite class label, `<id>_<class>`.
    pub class: String,
    /// Operator-assigned label.
    pub label: String,
    /// Post-execution summary, used as the step's doc string.
    pub doc: String,
    /// Ordered inputs, linked where possible.
    pub inputs: Vec<LinkedInput>,
    /// Ordered outputs.
    pub outputs: Vec<Port>,
}

/// Translate a run graph into the normalized step mapping and resolve
/// input sources.
///
/// Linkage matches by bare id equality across all steps, the step itself
/// included. When several steps expose the same output id, the first one in
/// run-export order wins; scanning stops at the first match so resolution
/// is deterministic.
pub fn translate(graph: &RunGraph) -> IndexMap<String, StepRecord> {
    let mut records: IndexMap<String, StepRecord> = IndexMap::new();

    for step in &graph.steps {
        records.insert(
            step.id.clone(),
            StepRecord {
                class: step.class_label(),
                label: step.label.clone(),
                doc: step.summary.clone(),
                inputs: step
                    .inputs
                    .iter()
                    .map(|port| LinkedInput {
                        id: port.id.clone(),
                        class_name: port.class_name.clone(),
                        source: None,
                    })
                    .collect(),
                outputs: step.outputs.clone(),
            },
        );
    }

    link_sources(&mut records);
    records
}

/// Linkage pass: set each input's `source` to `<producer class>/<output id>`
/// for the first step (in insertion order) exposing a matching output id.
fn link_sources(records: &mut IndexMap<String, StepRecord>) {
    let producers: Vec<(String, Vec<String>)> = records
        .values()
        .map(|record| {
            (
                record.class.clone(),
                record.outputs.iter().map(|port| port.id.clone()).collect(),
            )
        })
        .collect();

    for record in records.values_mut() {
        for input in &mut record.inputs {
            let matched = producers
                .iter()
                .find(|(_, outputs)| outputs.iter().any(|id| id == &input.id));
            if let Some((producer_class, _)) = matched {
                input.source = Some(format!("{}/{}", producer_class, input.id));
            }
        }
    }
}
