//! wfhub - deposit executed cryo-EM pipeline runs to WorkflowHub
//!
//! wfhub takes the run export of an executed image-processing pipeline,
//! reshapes it into a CWL workflow description, packages the description
//! plus its metadata as a Workflow RO-Crate, and uploads the crate to the
//! WorkflowHub cataloguing service.
//!
//! ## Key Properties
//!
//! - **One-way deposition**: collecting, translation, document build,
//!   validation, packaging, and upload run once per attempt with no retries
//!   and no partial artifacts; a failure ends the attempt.
//! - **External collaborators**: CWL syntax validation (`cwltool`) and
//!   diagram rendering (Graphviz `dot`) are subprocess collaborators behind
//!   traits, so the pipeline logic stays testable without either installed.
//! - **Ontology-annotated ports**: every step port carries a `cryoem:`
//!   ontology reference, or `unknown` when the type is unmapped.
//!
//! ## Example
//!
//! ```no_run
//! use wfhub::config::Config;
//! use wfhub::deposit::{Deposition, DepositionRequest};
//! use wfhub::hub::Submission;
//!
//! # async fn example() -> wfhub::Result<()> {
//! let request = DepositionRequest {
//!     title: "SPA consensus picking".to_string(),
//!     description: "Single particle analysis with consensus picking".to_string(),
//!     keywords: vec!["cryoem".to_string(), "spa".to_string()],
//!     publisher: "John Doe".to_string(),
//!     authors: vec!["Elisa Haley".to_string()],
//!     team_id: "12".to_string(),
//!     submission: Submission::New,
//! };
//!
//! let outcome = Deposition::new(Config::load())
//!     .run(std::path::Path::new("project.json"), &request)
//!     .await?;
//! println!("Workflow URL: {}", outcome.receipt.url);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod cwl;
pub mod deposit;
pub mod error;
pub mod hub;
pub mod pipeline;
pub mod rocrate;

pub use error::{Error, Result};
