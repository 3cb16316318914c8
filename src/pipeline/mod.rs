//! Executed-pipeline model, run-export parsing, and translation.
//!
//! The host pipeline engine is abstracted behind a JSON run export: each
//! executed step reports its id, class name, label, summary, and ordered
//! input/output ports. The translator reshapes that graph into the
//! normalized step mapping the CWL emitter consumes.

mod parser;
mod translator;
mod types;

pub use parser::{parse_run_graph, parse_run_graph_file};
pub use translator::{translate, LinkedInput, StepRecord};
pub use types::{PipelineStep, Port, RunGraph};
