//! Workflow-description emitter.
//!
//! Renders the normalized step mapping into a CWL `Workflow` document,
//! serializes it to YAML, and hands the serialized form to the external
//! validator. Only a positive verdict lets packaging proceed.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use super::document::{
    CwlMap, PortSpec, RunSpec, StepInput, WorkflowDocument, WorkflowStep, CWL_VERSION, RUN_CLASS,
    WORKFLOW_CLASS,
};
use super::ontology;
use super::validator::DocumentValidator;
use crate::error::Result;
use crate::pipeline::StepRecord;

/// Build a workflow document from translated step records.
pub fn build_document(
    steps: &IndexMap<String, StepRecord>,
    label: &str,
    doc: &str,
) -> WorkflowDocument {
    let mut rendered: IndexMap<String, WorkflowStep> = IndexMap::new();

    for record in steps.values() {
        let mut in_ports: IndexMap<String, StepInput> = IndexMap::new();
        let mut run_inputs: IndexMap<String, PortSpec> = IndexMap::new();
        for input in &record.inputs {
            in_ports.insert(
                input.id.clone(),
                StepInput {
                    source: input.source.clone(),
                },
            );
            run_inputs.insert(input.id.clone(), port_spec(&input.class_name));
        }

        let mut run_outputs: IndexMap<String, PortSpec> = IndexMap::new();
        let mut out = Vec::new();
        for output in &record.outputs {
            out.push(output.id.clone());
            run_outputs.insert(output.id.clone(), port_spec(&output.class_name));
        }

        rendered.insert(
            record.class.clone(),
            WorkflowStep {
                label: record.label.clone(),
                doc: record.doc.clone(),
                run: RunSpec {
                    class: RUN_CLASS.to_string(),
                    base_command: Vec::new(),
                    inputs: CwlMap::from_entries(run_inputs),
                    outputs: CwlMap::from_entries(run_outputs),
                },
                out,
                inputs: CwlMap::from_entries(in_ports),
            },
        );
    }

    let mut namespaces = IndexMap::new();
    namespaces.insert(
        ontology::ONTOLOGY_NAME.to_string(),
        ontology::ONTOLOGY_URL.to_string(),
    );

    WorkflowDocument {
        cwl_version: CWL_VERSION.to_string(),
        class: WORKFLOW_CLASS.to_string(),
        label: label.to_string(),
        doc: doc.to_string(),
        inputs: Vec::new(),
        outputs: Vec::new(),
        steps: CwlMap::from_entries(rendered),
        namespaces,
    }
}

fn port_spec(class_name: &str) -> PortSpec {
    PortSpec {
        port_type: "File".to_string(),
        format: ontology::format_of(class_name),
    }
}

/// Serialize a document to its durable YAML form.
pub fn to_yaml(document: &WorkflowDocument) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Write the document to `path` and run the external validator against the
/// serialized form. Returns the validator's verdict.
pub async fn emit(
    document: &WorkflowDocument,
    path: &Path,
    validator: &dyn DocumentValidator,
) -> Result<bool> {
    let yaml = to_yaml(document)?;
    tokio::fs::write(path, yaml).await?;
    debug!(path = %path.display(), steps = document.steps.len(), "Wrote CWL document");
    validator.validate(path).await
}
