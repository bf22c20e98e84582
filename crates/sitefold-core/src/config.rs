//! Bundle configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for sitefold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bundle input/output settings.
    pub bundle: BundleConfig,

    /// Image resource settings.
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Per-file filter settings.
    #[serde(default)]
    pub filters: FilterConfig,
}

/// Bundle input/output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Root markup document, relative to the config file.
    pub document: String,

    /// Dependency manifest script, relative to the config file.
    pub manifest: String,

    /// Output artifact path, relative to the config file.
    pub output: String,

    /// Whether to compact the assembled output.
    #[serde(default = "default_true")]
    pub minify: bool,

    /// Id of the element that receives the reconstructed body markup.
    #[serde(default = "default_root_id")]
    pub root_id: String,
}

/// Image resource configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Directory holding binary image files referenced by filtered sources.
    #[serde(default = "default_resource_dir")]
    pub dir: String,
}

/// Per-file filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Files whose quoted image references get inlined as data URIs.
    #[serde(default)]
    pub inline_images: Vec<String>,

    /// Whether to strip runtime file-loading behavior from the manifest.
    #[serde(default = "default_true")]
    pub strip_loader: bool,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_root_id() -> String {
    "root".to_string()
}

fn default_resource_dir() -> String {
    "res".to_string()
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            dir: default_resource_dir(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            inline_images: Vec::new(),
            strip_loader: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.bundle.document.is_empty() {
            return Err(CoreError::config("bundle.document cannot be empty"));
        }

        if self.bundle.manifest.is_empty() {
            return Err(CoreError::config("bundle.manifest cannot be empty"));
        }

        if self.bundle.output.is_empty() {
            return Err(CoreError::config("bundle.output cannot be empty"));
        }

        if self.bundle.root_id.is_empty() {
            return Err(CoreError::config("bundle.root_id cannot be empty"));
        }

        if !self.bundle.output.ends_with(".js") {
            tracing::warn!(output = %self.bundle.output, "bundle.output does not end in .js");
        }

        Ok(())
    }
}
