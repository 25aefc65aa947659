//! Configuration management for foxtype code generation.
//!
//! This module defines the `Config` struct that controls where documents are
//! read from and how the generated files look. The configuration can be
//! loaded from a YAML file or created programmatically; every field except
//! the share id has a default.
//!
//! # Examples
//!
//! ```no_run
//! use foxtype_core::config::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> foxtype_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::new("2a4ce230-99a8-411a-9b31-908d607a3e6e");
//! config.output_dir = "src/api".into();
//!
//! // Or load from a config file
//! let config = Config::from_file("foxtype.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Default config file name looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "foxtype.yaml";

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Id of the Apifox shared doc
    #[serde(default)]
    pub share_id: Option<String>,

    /// Base URL of the Apifox instance serving the shared doc
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Output directory, cleared and recreated on every run
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Module the generated services import their `request` function from
    #[serde(default = "default_request_import")]
    pub request_import: String,

    /// Name of the response every endpoint derives its `Response` type from
    #[serde(default = "default_success_response")]
    pub success_response: String,

    /// Abort on the first endpoint without a success response instead of skipping it
    #[serde(default)]
    pub strict: bool,

    /// Optional directory with template overrides
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            share_id: None,
            base_url: default_base_url(),
            output_dir: default_output_dir(),
            request_import: default_request_import(),
            success_response: default_success_response(),
            strict: false,
            template_dir: None,
        }
    }
}

impl Config {
    /// Create a new Config for a share with default values
    pub fn new(share_id: impl Into<String>) -> Self {
        Self {
            share_id: Some(share_id.into()),
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            crate::Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

fn default_base_url() -> Url {
    Url::parse("https://www.apifox.cn").expect("default base URL is valid")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_request_import() -> String {
    "@/utils/request".to_string()
}

fn default_success_response() -> String {
    "OK".to_string()
}
