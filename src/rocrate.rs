//! Workflow RO-Crate packaging.
//!
//! Builds the `ro-crate-metadata.json` entity graph for a workflow crate
//! (main CWL workflow, data files, an optional diagram, publisher and
//! author Person entities) and writes the whole crate as one zip archive.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Name of the crate descriptor file inside the archive.
pub const METADATA_FILENAME: &str = "ro-crate-metadata.json";

/// License recorded on every deposited crate.
pub const CRATE_LICENSE: &str = "Apache-2.0";

const CRATE_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";
const CRATE_PROFILE: &str = "https://w3id.org/ro/crate/1.1";
const CWL_LANGUAGE_ID: &str = "#cwl";

/// A file carried inside the crate.
#[derive(Debug, Clone)]
struct CrateEntry {
    name: String,
    bytes: Vec<u8>,
}

/// A workflow RO-Crate under construction.
#[derive(Debug, Clone)]
pub struct RoCrate {
    name: String,
    description: String,
    keywords: Vec<String>,
    publisher: Option<String>,
    authors: Vec<String>,
    workflow: CrateEntry,
    files: Vec<CrateEntry>,
    image: Option<CrateEntry>,
}

impl RoCrate {
    /// Start a crate around its main workflow file.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        workflow_name: impl Into<String>,
        workflow_bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            keywords: Vec::new(),
            publisher: None,
            authors: Vec::new(),
            workflow: CrateEntry {
                name: workflow_name.into(),
                bytes: workflow_bytes,
            },
            files: Vec::new(),
            image: None,
        }
    }

    /// Set the publishing person. The publisher is also the first creator.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Add workflow authors beyond the publisher.
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the crate keywords.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Add a data file to the crate.
    pub fn with_file(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.files.push(CrateEntry {
            name: name.into(),
            bytes,
        });
        self
    }

    /// Add the workflow diagram and record it as the crate image.
    pub fn with_image(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.image = Some(CrateEntry {
            name: name.into(),
            bytes,
        });
        self
    }

    /// Build the JSON-LD entity graph for `ro-crate-metadata.json`.
    pub fn metadata(&self) -> Value {
        let mut graph = Vec::new();

        graph.push(json!({
            "@id": METADATA_FILENAME,
            "@type": "CreativeWork",
            "conformsTo": {"@id": CRATE_PROFILE},
            "about": {"@id": "./"},
        }));

        let mut has_part = vec![json!({"@id": self.workflow.name})];
        for file in &self.files {
            has_part.push(json!({"@id": file.name}));
        }
        if let Some(image) = &self.image {
            has_part.push(json!({"@id": image.name}));
        }

        let creators: Vec<Value> = self
            .publisher
            .iter()
            .chain(self.authors.iter())
            .map(|name| json!({"@id": person_id(name)}))
            .collect();

        let mut root = json!({
            "@id": "./",
            "@type": "Dataset",
            "name": self.name,
            "description": self.description,
            "datePublished": Utc::now().format("%Y-%m-%d").to_string(),
            "license": CRATE_LICENSE,
            "keywords": self.keywords,
            "mainEntity": {"@id": self.workflow.name},
            "hasPart": has_part,
        });
        if let Some(publisher) = &self.publisher {
            root["publisher"] = json!({"@id": person_id(publisher)});
        }
        if !creators.is_empty() {
            root["creator"] = Value::Array(creators);
        }
        graph.push(root);

        let mut workflow = json!({
            "@id": self.workflow.name,
            "@type": ["File", "SoftwareSourceCode", "ComputationalWorkflow"],
            "programmingLanguage": {"@id": CWL_LANGUAGE_ID},
        });
        if let Some(image) = &self.image {
            workflow["image"] = json!({"@id": image.name});
        }
        graph.push(workflow);

        graph.push(json!({
            "@id": CWL_LANGUAGE_ID,
            "@type": "ComputerLanguage",
            "name": "Common Workflow Language",
            "alternateName": "CWL",
            "identifier": {"@id": "https://w3id.org/cwl/v1.1/"},
            "url": {"@id": "https://www.commonwl.org/"},
        }));

        for file in &self.files {
            graph.push(json!({"@id": file.name, "@type": "File"}));
        }
        if let Some(image) = &self.image {
            graph.push(json!({"@id": image.name, "@type": ["File", "ImageObject"]}));
        }

        for name in self.publisher.iter().chain(self.authors.iter()) {
            graph.push(json!({
                "@id": person_id(name),
                "@type": "Person",
                "name": name,
            }));
        }

        json!({
            "@context": CRATE_CONTEXT,
            "@graph": graph,
        })
    }

    /// Write the crate as a zip archive at `dest`.
    pub fn write_zip(&self, dest: &Path) -> Result<()> {
        let file = std::fs::File::create(dest)?;
        let mut writer = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let metadata = serde_json::to_vec_pretty(&self.metadata())?;
        self.add_entry(&mut writer, options, METADATA_FILENAME, &metadata)?;
        self.add_entry(&mut writer, options, &self.workflow.name, &self.workflow.bytes)?;
        for entry in &self.files {
            self.add_entry(&mut writer, options, &entry.name, &entry.bytes)?;
        }
        if let Some(image) = &self.image {
            self.add_entry(&mut writer, options, &image.name, &image.bytes)?;
        }

        writer
            .finish()
            .map_err(|e| Error::Package(format!("Failed to finish crate archive: {}", e)))?;
        Ok(())
    }

    fn add_entry(
        &self,
        writer: &mut ZipWriter<std::fs::File>,
        options: SimpleFileOptions,
        name: &str,
        bytes: &[u8],
    ) -> Result<()> {
        writer
            .start_file(name, options)
            .map_err(|e| Error::Package(format!("Failed to add {} to crate: {}", name, e)))?;
        writer.write_all(bytes)?;
        Ok(())
    }
}

/// Local identifier for a Person entity.
fn person_id(name: &str) -> String {
    format!("#{}", name.trim().replace(' ', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_crate() -> RoCrate {
        RoCrate::new(
            "spa workflow",
            "single particle analysis run",
            "workflow.cwl",
            b"cwlVersion: v1.1\n".to_vec(),
        )
        .with_publisher("John Doe")
        .with_authors(vec!["Elisa Haley".to_string(), "Keith Winter".to_string()])
        .with_keywords(vec!["cryoem".to_string(), "spa".to_string()])
        .with_file("workflow.json", b"[]".to_vec())
    }

    #[test]
    fn test_metadata_graph_entities() {
        let metadata = sample_crate().metadata();
        let graph = metadata["@graph"].as_array().unwrap();

        let root = graph
            .iter()
            .find(|e| e["@id"] == "./")
            .expect("root dataset entity");
        assert_eq!(root["mainEntity"]["@id"], "workflow.cwl");
        assert_eq!(root["license"], CRATE_LICENSE);
        assert_eq!(root["publisher"]["@id"], "#John-Doe");
        assert_eq!(root["creator"].as_array().unwrap().len(), 3);

        let persons: Vec<&Value> = graph.iter().filter(|e| e["@type"] == "Person").collect();
        assert_eq!(persons.len(), 3);

        let workflow = graph
            .iter()
            .find(|e| e["@id"] == "workflow.cwl")
            .expect("workflow entity");
        assert!(workflow["@type"]
            .as_array()
            .unwrap()
            .contains(&json!("ComputationalWorkflow")));
    }

    #[test]
    fn test_image_is_linked_from_workflow() {
        let metadata = sample_crate()
            .with_image("workflow.svg", b"<svg/>".to_vec())
            .metadata();
        let graph = metadata["@graph"].as_array().unwrap();

        let workflow = graph.iter().find(|e| e["@id"] == "workflow.cwl").unwrap();
        assert_eq!(workflow["image"]["@id"], "workflow.svg");

        let image = graph.iter().find(|e| e["@id"] == "workflow.svg").unwrap();
        assert!(image["@type"].as_array().unwrap().contains(&json!("ImageObject")));
    }

    #[test]
    fn test_write_zip_contains_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("workflow.crate.zip");

        sample_crate()
            .with_image("workflow.svg", b"<svg/>".to_vec())
            .write_zip(&dest)
            .unwrap();

        let file = std::fs::File::open(&dest).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        assert!(names.contains(&METADATA_FILENAME.to_string()));
        assert!(names.contains(&"workflow.cwl".to_string()));
        assert!(names.contains(&"workflow.json".to_string()));
        assert!(names.contains(&"workflow.svg".to_string()));
    }
}
