//! CWL document construction, serialization, and external validation.
//!
//! The document model mirrors what the cataloguing service expects: a CWL
//! v1.1 `Workflow` with all data flow expressed on step-level ports, each
//! port annotated with a cryo-EM ontology reference.

pub mod document;
mod emitter;
pub mod ontology;
mod validator;

pub use document::{CwlMap, PortSpec, RunSpec, StepInput, WorkflowDocument, WorkflowStep};
pub use emitter::{build_document, emit, to_yaml};
pub use validator::{CwltoolValidator, DiagramRenderer, DocumentValidator, DotRenderer};
