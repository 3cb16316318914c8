//! Configuration management.
//!
//! wfhub configuration can come from:
//! - Environment variables (WFHUB_*)
//! - Config file (~/.config/wfhub/config.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// wfhub configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cataloguing service configuration
    #[serde(default)]
    pub hub: HubConfig,

    /// External tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Cataloguing service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// WorkflowHub base URL
    #[serde(default = "default_hub_url")]
    pub base_url: String,

    /// HTTP timeout for the upload (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: default_hub_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_hub_url() -> String {
    "https://workflowhub.eu".to_string()
}

fn default_timeout() -> u64 {
    120
}

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// cwltool executable (validation and dot output)
    #[serde(default = "default_cwltool")]
    pub cwltool: String,

    /// Graphviz dot executable (diagram rendering)
    #[serde(default = "default_dot")]
    pub dot: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cwltool: default_cwltool(),
            dot: default_dot(),
        }
    }
}

fn default_cwltool() -> String {
    "cwltool".to_string()
}

fn default_dot() -> String {
    "dot".to_string()
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CWL document and crate zip are written to.
    /// Defaults to the run export's directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = Self::config_dir().join("config.toml");
        if let Ok(partial) = Self::load_partial_from_path(&path) {
            config.apply_partial(partial);
        }

        config.apply_env_overrides();
        config
    }

    /// Get the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("wfhub"))
            .unwrap_or_else(|| PathBuf::from(".wfhub"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WFHUB_HUB_URL") {
            self.hub.base_url = url;
        }
        if let Ok(timeout) = std::env::var("WFHUB_HTTP_TIMEOUT_SECONDS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.hub.timeout_seconds = parsed;
            }
        }
        if let Ok(cwltool) = std::env::var("WFHUB_CWLTOOL") {
            self.tools.cwltool = cwltool;
        }
        if let Ok(dot) = std::env::var("WFHUB_DOT") {
            self.tools.dot = dot;
        }
        if let Ok(dir) = std::env::var("WFHUB_OUTPUT_DIR") {
            self.output.dir = Some(PathBuf::from(dir));
        }
    }

    fn load_partial_from_path(path: &Path) -> std::result::Result<PartialConfig, ()> {
        let content = std::fs::read_to_string(path).map_err(|_| ())?;
        toml::from_str(&content).map_err(|_| ())
    }

    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(hub) = partial.hub {
            self.hub = hub;
        }
        if let Some(tools) = partial.tools {
            self.tools = tools;
        }
        if let Some(output) = partial.output {
            self.output = output;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    hub: Option<HubConfig>,
    tools: Option<ToolsConfig>,
    output: Option<OutputConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.hub.base_url, "https://workflowhub.eu");
        assert_eq!(config.hub.timeout_seconds, 120);
        assert_eq!(config.tools.cwltool, "cwltool");
        assert_eq!(config.tools.dot, "dot");
        assert!(config.output.dir.is_none());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("WFHUB_HUB_URL", "https://hub.example.org");
        std::env::set_var("WFHUB_CWLTOOL", "/opt/cwl/bin/cwltool");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.hub.base_url, "https://hub.example.org");
        assert_eq!(config.tools.cwltool, "/opt/cwl/bin/cwltool");

        std::env::remove_var("WFHUB_HUB_URL");
        std::env::remove_var("WFHUB_CWLTOOL");
    }

    #[test]
    fn test_partial_config_merge() {
        let partial: PartialConfig = toml::from_str(
            r#"
[hub]
base_url = "https://dev.workflowhub.eu"
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_partial(partial);
        assert_eq!(config.hub.base_url, "https://dev.workflowhub.eu");
        assert_eq!(config.hub.timeout_seconds, 120);
        assert_eq!(config.tools.dot, "dot");
    }
}
