//! Loading configuration documents from disk
//!
//! Two document kinds are understood:
//!
//! - [`ComponentConfig`]: optional `metas` and `runtime_args` sections for
//!   one component instance.
//! - [`ComponentManifest`]: the declared constructor and handlers of a
//!   component type, used to validate components that are not described by
//!   a [`Component`](crate::contract::Component) implementation.
//!
//! The format is picked from the file extension: `.yaml`/`.yml`, `.json` or
//! `.toml`.
//!
//! ```yaml
//! metas:
//!   name: indexer
//!   workspace: /data/ws
//! runtime_args:
//!   replica_id: 2
//!   pea_id: 1
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::contract::{ComponentDescriptor, HandlerSpec, Signature};
use crate::error::{ConfigError, Result};
use crate::metas::{Metas, RuntimeArgs};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            "toml" => Ok(DocumentFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parse a document in this format
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
            DocumentFormat::Toml => Ok(toml::from_str(content)?),
        }
    }
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    tracing::debug!(path = %path.display(), ?format, "Loading configuration document");
    format.parse(&content)
}

/// Configuration sources of one component instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    pub metas: Metas,
    pub runtime_args: RuntimeArgs,
}

impl ComponentConfig {
    /// Load a configuration document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_document(path.as_ref())
    }

    /// Parse a configuration document
    pub fn parse(format: DocumentFormat, content: &str) -> Result<Self> {
        format.parse(content)
    }
}

/// Declarative description of a component type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentManifest {
    pub name: String,
    #[serde(default)]
    pub constructor: Signature,
    #[serde(default)]
    pub handlers: Vec<HandlerSpec>,
}

impl ComponentManifest {
    /// Load a manifest from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_document(path.as_ref())
    }

    /// Parse a manifest
    pub fn parse(format: DocumentFormat, content: &str) -> Result<Self> {
        format.parse(content)
    }

    pub fn into_descriptor(self) -> ComponentDescriptor {
        ComponentDescriptor {
            name: self.name,
            constructor: self.constructor,
            handlers: self.handlers,
        }
    }
}

impl From<ComponentManifest> for ComponentDescriptor {
    fn from(manifest: ComponentManifest) -> Self {
        manifest.into_descriptor()
    }
}
