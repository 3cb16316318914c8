//! External validation and diagram-rendering collaborators.
//!
//! Syntax validation is delegated to `cwltool --validate`; the workflow
//! diagram comes from `cwltool --print-dot` piped through Graphviz `dot`.
//! Both run as blocking subprocess calls with no retry. A validator that
//! cannot run at all is an error; a renderer that cannot run degrades to
//! "no diagram".

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Verdict-producing syntax check over a serialized workflow document.
#[async_trait]
pub trait DocumentValidator: Send + Sync {
    /// Returns `true` when the document is syntactically valid.
    async fn validate(&self, document: &Path) -> Result<bool>;
}

/// Optional diagram rendering for a serialized workflow document.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Returns the path of the rendered image, or `None` when rendering
    /// was not possible.
    async fn render(&self, document: &Path) -> Result<Option<PathBuf>>;
}

/// `cwltool --validate` wrapper.
pub struct CwltoolValidator {
    executable: String,
}

impl CwltoolValidator {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl DocumentValidator for CwltoolValidator {
    async fn validate(&self, document: &Path) -> Result<bool> {
        let output = Command::new(&self.executable)
            .arg("--validate")
            .arg(document)
            .output()
            .await
            .map_err(|e| {
                Error::Validation(format!("Failed to run {}: {}", self.executable, e))
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let valid = output_indicates_valid(&text);
        debug!(document = %document.display(), valid, "cwltool validation finished");
        Ok(valid)
    }
}

/// cwltool prints `<path> is valid CWL` for documents that pass.
fn output_indicates_valid(output: &str) -> bool {
    output.contains("is valid CWL")
}

/// `cwltool --print-dot | dot -Tsvg` renderer. The SVG lands next to the
/// document, with the extension swapped.
pub struct DotRenderer {
    cwltool: String,
    dot: String,
}

impl DotRenderer {
    pub fn new(cwltool: impl Into<String>, dot: impl Into<String>) -> Self {
        Self {
            cwltool: cwltool.into(),
            dot: dot.into(),
        }
    }
}

#[async_trait]
impl DiagramRenderer for DotRenderer {
    async fn render(&self, document: &Path) -> Result<Option<PathBuf>> {
        let dot_source = match Command::new(&self.cwltool)
            .arg("--print-dot")
            .arg(document)
            .output()
            .await
        {
            Ok(output) if output.status.success() => output.stdout,
            Ok(output) => {
                warn!(
                    status = %output.status,
                    "cwltool --print-dot failed; the entry will not have a diagram"
                );
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Failed to run {}; the entry will not have a diagram", self.cwltool);
                return Ok(None);
            }
        };

        let mut child = match Command::new(&self.dot)
            .arg("-Tsvg")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "Failed to run {}; the entry will not have a diagram", self.dot);
                return Ok(None);
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&dot_source).await {
                warn!(error = %e, "Failed to feed dot; the entry will not have a diagram");
                return Ok(None);
            }
        }

        let rendered = match child.wait_with_output().await {
            Ok(output) if output.status.success() => output.stdout,
            Ok(output) => {
                warn!(status = %output.status, "dot failed; the entry will not have a diagram");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "dot did not finish; the entry will not have a diagram");
                return Ok(None);
            }
        };

        let svg_path = document.with_extension("svg");
        tokio::fs::write(&svg_path, rendered).await?;
        debug!(path = %svg_path.display(), "Rendered workflow diagram");
        Ok(Some(svg_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_marker_detection() {
        assert!(output_indicates_valid("workflow.cwl is valid CWL"));
        assert!(output_indicates_valid(
            "INFO resolved\n/tmp/workflow.cwl is valid CWL\n"
        ));
        assert!(!output_indicates_valid("ERROR tool requires node"));
        assert!(!output_indicates_valid(""));
    }

    #[tokio::test]
    async fn test_missing_validator_executable_is_an_error() {
        let validator = CwltoolValidator::new("wfhub-missing-cwltool");
        let result = validator.validate(Path::new("workflow.cwl")).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_renderer_executable_degrades_to_none() {
        let renderer = DotRenderer::new("wfhub-missing-cwltool", "wfhub-missing-dot");
        let rendered = renderer.render(Path::new("workflow.cwl")).await.unwrap();
        assert!(rendered.is_none());
    }
}
