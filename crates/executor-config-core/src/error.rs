//! Error types for workspace resolution and component registration
//!
//! Both error families describe misconfiguration, not transient faults, so
//! callers surface them immediately instead of retrying.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::contract::ContractFinding;

/// Errors raised while merging configuration sources or resolving a workspace
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `metas` nor `runtime_args` carries a workspace
    #[error("workspace not set")]
    WorkspaceNotSet,

    /// Neither `metas` nor `runtime_args` carries a name
    #[error("name not set")]
    NameNotSet,

    /// A relative workspace could not be anchored at the current directory
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// A configuration value has the wrong shape
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// File access or directory creation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// A configuration file extension is not one of the known formats
    #[error("unsupported configuration format: '{0}'")]
    UnsupportedFormat(String),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the error comes from the configuration values themselves
    /// rather than from the environment the process runs in
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::WorkspaceNotSet
                | ConfigError::NameNotSet
                | ConfigError::InvalidValue { .. }
                | ConfigError::Parse(_)
                | ConfigError::UnsupportedFormat(_)
        )
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(format!("TOML error: {}", err))
    }
}

/// A component's declared interface does not match the calling convention
///
/// Raised at registration time. The component never reaches the registry, so
/// no instance of it can be constructed.
#[derive(Error, Debug, Clone)]
pub struct ContractViolation {
    /// Name of the rejected component
    pub component: String,
    /// Every rule failure found while checking the component
    pub findings: Vec<ContractFinding>,
}

impl ContractViolation {
    /// Create a violation from collected findings
    pub fn new(component: impl Into<String>, findings: Vec<ContractFinding>) -> Self {
        Self {
            component: component.into(),
            findings,
        }
    }

    /// Check whether a given rule contributed to this violation
    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.findings.iter().any(|f| f.rule_id == rule_id)
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component '{}' violates the calling contract ({} finding(s))",
            self.component,
            self.findings.len()
        )?;
        for finding in &self.findings {
            write!(f, "\n  - {}", finding)?;
        }
        Ok(())
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
