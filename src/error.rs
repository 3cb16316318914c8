//! Error types for wfhub.
//!
//! A deposition is a single one-way attempt; every error here is terminal
//! for the attempt and is reported to the operator, who re-runs the whole
//! step to retry.

use thiserror::Error;

/// Result type alias for wfhub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// wfhub error types.
///
/// Each variant includes a code that callers can match programmatically.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Package error: {0}")]
    Package(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Pipeline(_) => "PIPELINE_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Document(_) => "DOCUMENT_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Package(_) => "PACKAGE_ERROR",
            Error::Upload(_) => "UPLOAD_ERROR",
            Error::Credential(_) => "CREDENTIAL_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Http(_) => "HTTP_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Validation("bad".into()).code(), "VALIDATION_ERROR");
        assert_eq!(Error::Upload("bad".into()).code(), "UPLOAD_ERROR");
    }

    #[test]
    fn test_error_display() {
        let err = Error::Document("steps missing".to_string());
        assert_eq!(err.to_string(), "Document error: steps missing");
    }
}
