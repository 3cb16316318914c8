//! Deposition orchestration.
//!
//! One deposition is one blocking unit of work:
//! `collecting -> translated -> document_built -> valid -> packaged ->
//! uploaded`, with `invalid` as terminal abort. Each arrow is one-way; a
//! failure at any stage ends the attempt and the operator re-runs the whole
//! step to retry.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::credentials::{self, ApiToken};
use crate::cwl::{self, CwltoolValidator, DiagramRenderer, DocumentValidator, DotRenderer};
use crate::error::{Error, Result};
use crate::hub::{HubClient, HubReceipt, Submission};
use crate::pipeline;
use crate::rocrate::RoCrate;

/// Workflow document filename inside the output directory and the crate.
pub const WORKFLOW_CWL: &str = "workflow.cwl";

/// Raw run export filename inside the crate.
pub const WORKFLOW_JSON: &str = "workflow.json";

/// Crate archive filename.
pub const WORKFLOW_CRATE: &str = "workflow.crate.zip";

/// Appended to every crate description so a reader can re-run the pipeline.
const REPRODUCE_NOTE: &str = "\r\n\r\n In order to reproduce this workflow install Scipion \
software (http://scipion.i2pc.es/) and import the workflow.json file";

/// Stages of one deposition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositionStage {
    Collecting,
    Translated,
    DocumentBuilt,
    Valid,
    Invalid,
    Packaged,
    Uploaded,
}

impl fmt::Display for DepositionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collecting => write!(f, "collecting"),
            Self::Translated => write!(f, "translated"),
            Self::DocumentBuilt => write!(f, "document_built"),
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
            Self::Packaged => write!(f, "packaged"),
            Self::Uploaded => write!(f, "uploaded"),
        }
    }
}

/// Operator-supplied entry metadata for one deposition.
#[derive(Debug, Clone)]
pub struct DepositionRequest {
    /// Crate and workflow title.
    pub title: String,
    /// Crate and workflow description.
    pub description: String,
    /// Keywords describing the workflow topics.
    pub keywords: Vec<String>,
    /// Publishing person.
    pub publisher: String,
    /// Workflow authors beyond the publisher.
    pub authors: Vec<String>,
    /// WorkflowHub team the entry belongs to.
    pub team_id: String,
    /// New entry, or new version of an existing one.
    pub submission: Submission,
}

/// Result of a completed deposition.
#[derive(Debug, Clone)]
pub struct DepositionOutcome {
    /// Where the crate archive was written.
    pub crate_path: PathBuf,
    /// What WorkflowHub reported back.
    pub receipt: HubReceipt,
}

/// A single-use deposition runner.
pub struct Deposition {
    config: Config,
    validator: Box<dyn DocumentValidator>,
    renderer: Box<dyn DiagramRenderer>,
}

impl Deposition {
    /// Create a runner with the default cwltool/dot collaborators.
    pub fn new(config: Config) -> Self {
        let validator = CwltoolValidator::new(config.tools.cwltool.clone());
        let renderer = DotRenderer::new(config.tools.cwltool.clone(), config.tools.dot.clone());
        Self {
            config,
            validator: Box::new(validator),
            renderer: Box::new(renderer),
        }
    }

    /// Replace the document validator.
    pub fn with_validator(mut self, validator: Box<dyn DocumentValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the diagram renderer.
    pub fn with_renderer(mut self, renderer: Box<dyn DiagramRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run the attempt up to and including packaging; returns the crate path.
    ///
    /// Stops with an error before any archive is written when translation
    /// fails or the document does not validate.
    pub async fn prepare(&self, project: &Path, request: &DepositionRequest) -> Result<PathBuf> {
        info!(stage = %DepositionStage::Collecting, project = %project.display(), "Reading run export");
        let raw_export = tokio::fs::read_to_string(project).await?;
        let graph = pipeline::parse_run_graph(&raw_export)?;

        let records = pipeline::translate(&graph);
        info!(stage = %DepositionStage::Translated, steps = records.len(), "Translated run graph");

        let document = cwl::build_document(&records, &request.title, &request.description);
        let out_dir = self.output_dir(project);
        tokio::fs::create_dir_all(&out_dir).await?;
        let cwl_path = out_dir.join(WORKFLOW_CWL);
        info!(stage = %DepositionStage::DocumentBuilt, path = %cwl_path.display(), "Saving CWL");
        let valid = cwl::emit(&document, &cwl_path, self.validator.as_ref()).await?;

        if !valid {
            info!(stage = %DepositionStage::Invalid, "cwltool rejected the document");
            return Err(Error::Validation(
                "The workflow document is not valid CWL; it is not possible to create the crate"
                    .to_string(),
            ));
        }
        info!(stage = %DepositionStage::Valid, "Document is valid CWL");

        let diagram = self.renderer.render(&cwl_path).await?;

        let workflow_bytes = tokio::fs::read(&cwl_path).await?;
        let mut ro_crate = RoCrate::new(
            &request.title,
            format!("{}{}", request.description, REPRODUCE_NOTE),
            WORKFLOW_CWL,
            workflow_bytes,
        )
        .with_publisher(&request.publisher)
        .with_authors(request.authors.clone())
        .with_keywords(request.keywords.clone())
        .with_file(WORKFLOW_JSON, raw_export.into_bytes());

        if let Some(diagram_path) = diagram {
            let name = diagram_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "workflow.svg".to_string());
            let bytes = tokio::fs::read(&diagram_path).await?;
            ro_crate = ro_crate.with_image(name, bytes);
        }

        let crate_path = out_dir.join(WORKFLOW_CRATE);
        ro_crate.write_zip(&crate_path)?;
        info!(stage = %DepositionStage::Packaged, path = %crate_path.display(), "Crate created");
        Ok(crate_path)
    }

    /// Run the whole attempt: prepare, then upload.
    pub async fn run(
        &self,
        project: &Path,
        request: &DepositionRequest,
    ) -> Result<DepositionOutcome> {
        let crate_path = self.prepare(project, request).await?;

        let token = ApiToken::from_env()?;
        let client = HubClient::new(&self.config, token)?;
        let receipt = client
            .submit(&crate_path, &request.team_id, &request.submission)
            .await?;
        info!(stage = %DepositionStage::Uploaded, url = %receipt.url, "Deposition complete");

        Ok(DepositionOutcome {
            crate_path,
            receipt,
        })
    }

    fn output_dir(&self, project: &Path) -> PathBuf {
        if let Some(dir) = &self.config.output.dir {
            return dir.clone();
        }
        match project.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Report setup problems before an attempt: a missing Graphviz `dot`
/// executable and a missing API token.
pub fn preflight(config: &Config) -> Vec<String> {
    let mut issues = Vec::new();
    if !executable_in_path(&config.tools.dot) {
        issues.push(
            "The Graphviz dot tool is not installed and the WorkflowHub entry will not have \
             a proper diagram."
                .to_string(),
        );
    }
    if !ApiToken::is_configured() {
        issues.push(format!(
            "Environment variable {} is not set.",
            credentials::WORKFLOWHUB_API_TOKEN
        ));
    }
    issues
}

fn executable_in_path(name: &str) -> bool {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(name).is_file()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct AcceptAll;

    #[async_trait]
    impl DocumentValidator for AcceptAll {
        async fn validate(&self, _document: &Path) -> Result<bool> {
            Ok(true)
        }
    }

    struct RejectAll;

    #[async_trait]
    impl DocumentValidator for RejectAll {
        async fn validate(&self, _document: &Path) -> Result<bool> {
            Ok(false)
        }
    }

    struct NoDiagram;

    #[async_trait]
    impl DiagramRenderer for NoDiagram {
        async fn render(&self, _document: &Path) -> Result<Option<PathBuf>> {
            Ok(None)
        }
    }

    fn request() -> DepositionRequest {
        DepositionRequest {
            title: "spa workflow".to_string(),
            description: "single particle run".to_string(),
            keywords: vec!["cryoem".to_string()],
            publisher: "John Doe".to_string(),
            authors: vec![],
            team_id: "12".to_string(),
            submission: Submission::New,
        }
    }

    fn write_project(dir: &Path) -> PathBuf {
        let path = dir.join("project.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "1", "class": "ProtImportVolumes", "label": "import", "summary": "ok",
                 "outputs": [{"id": "vol", "class": "Volume"}]},
                {"id": "2", "class": "ProtCreateMask3D", "label": "mask", "summary": "ok",
                 "inputs": [{"id": "vol", "class": "Volume"}]}
            ]"#,
        )
        .unwrap();
        path
    }

    fn deposition() -> Deposition {
        Deposition::new(Config::default())
            .with_validator(Box::new(AcceptAll))
            .with_renderer(Box::new(NoDiagram))
    }

    #[tokio::test]
    async fn test_prepare_creates_document_and_crate() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_project(dir.path());

        let crate_path = deposition().prepare(&project, &request()).await.unwrap();
        assert_eq!(crate_path, dir.path().join(WORKFLOW_CRATE));
        assert!(crate_path.is_file());
        assert!(dir.path().join(WORKFLOW_CWL).is_file());

        let cwl = std::fs::read_to_string(dir.path().join(WORKFLOW_CWL)).unwrap();
        assert!(cwl.contains("source: 1_ProtImportVolumes/vol"));
    }

    #[tokio::test]
    async fn test_invalid_document_aborts_before_packaging() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_project(dir.path());

        let result = Deposition::new(Config::default())
            .with_validator(Box::new(RejectAll))
            .with_renderer(Box::new(NoDiagram))
            .prepare(&project, &request())
            .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "VALIDATION_ERROR");
        assert!(!dir.path().join(WORKFLOW_CRATE).exists());
    }

    #[tokio::test]
    async fn test_malformed_export_aborts_before_document() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project.json");
        std::fs::write(&project, r#"[{"id": "1", "class": "Prot"}]"#).unwrap();

        let result = deposition().prepare(&project, &request()).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "PARSE_ERROR");
        assert!(!dir.path().join(WORKFLOW_CWL).exists());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(DepositionStage::Collecting.to_string(), "collecting");
        assert_eq!(DepositionStage::DocumentBuilt.to_string(), "document_built");
        assert_eq!(DepositionStage::Uploaded.to_string(), "uploaded");
    }

    #[test]
    fn test_executable_lookup() {
        assert!(executable_in_path("sh"));
        assert!(!executable_in_path("wfhub-definitely-missing-tool"));
    }
}
