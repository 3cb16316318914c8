//! WorkflowHub client.
//!
//! One blocking multipart POST of the crate zip, authenticated with the
//! operator's API token. No retry: a failed upload ends the attempt and the
//! operator re-runs the whole deposition.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::credentials::ApiToken;
use crate::error::{Error, Result};

/// Whether the deposition creates a new entry or a new version of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Create a brand-new WorkflowHub entry.
    New,
    /// Add a version to the existing entry with this workflow id.
    NewVersion(String),
}

/// What WorkflowHub reported back for an accepted deposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubReceipt {
    /// Version number the upload became.
    pub latest_version: u32,
    /// URL of that version.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct HubResponse {
    data: HubData,
}

#[derive(Debug, Deserialize)]
struct HubData {
    attributes: HubAttributes,
}

#[derive(Debug, Deserialize)]
struct HubAttributes {
    latest_version: u32,
    versions: Vec<HubVersion>,
}

#[derive(Debug, Deserialize)]
struct HubVersion {
    url: String,
}

/// WorkflowHub API client.
pub struct HubClient {
    client: Client,
    base_url: String,
    token: ApiToken,
}

impl HubClient {
    /// Build a client from configuration and a token.
    pub fn new(config: &Config, token: ApiToken) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.hub.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.hub.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Endpoint for a submission kind.
    fn endpoint(&self, submission: &Submission) -> String {
        match submission {
            Submission::New => format!("{}/workflows", self.base_url),
            Submission::NewVersion(id) => {
                format!("{}/workflows/{}/create_version", self.base_url, id)
            }
        }
    }

    /// Upload a crate zip and return the receipt for the created version.
    pub async fn submit(
        &self,
        crate_path: &Path,
        team_id: &str,
        submission: &Submission,
    ) -> Result<HubReceipt> {
        let bytes = tokio::fs::read(crate_path).await?;
        let filename = crate_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workflow.crate.zip".to_string());

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/zip")
            .map_err(|e| Error::Upload(format!("Invalid crate MIME type: {}", e)))?;
        let form = Form::new()
            .part("ro_crate", part)
            .text("workflow[project_ids][]", team_id.to_string());

        let endpoint = self.endpoint(submission);
        debug!(endpoint = %endpoint, crate_path = %crate_path.display(), "Submitting crate");

        let response = self
            .client
            .post(&endpoint)
            .header("authorization", format!("Token {}", self.token.reveal()))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !matches!(status.as_u16(), 200 | 201) {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upload(format!(
                "WorkflowHub returned {}: {}",
                status, body
            )));
        }

        let body: HubResponse = response.json().await?;
        let receipt = parse_receipt(body)?;
        info!(
            version = receipt.latest_version,
            url = %receipt.url,
            "WorkflowHub accepted the deposition"
        );
        Ok(receipt)
    }
}

/// Extract the latest version and its URL out of the service response.
fn parse_receipt(response: HubResponse) -> Result<HubReceipt> {
    let attributes = response.data.attributes;
    let latest = attributes.latest_version;
    let version = attributes
        .versions
        .get(latest.saturating_sub(1) as usize)
        .ok_or_else(|| {
            Error::Upload(format!(
                "WorkflowHub response did not include version {}",
                latest
            ))
        })?;
    Ok(HubReceipt {
        latest_version: latest,
        url: version.url.clone(),
    })
}
