//! Configuration sources for a component instance
//!
//! Two layers feed the resolver:
//!
//! - [`Metas`]: declared alongside the component, e.g. in its configuration
//!   document. Defaults leave every field unset.
//! - [`RuntimeArgs`]: injected by the orchestrator when it deploys a replica
//!   or shard, either from a document, the process environment or flags.
//!
//! Only the keys `name`, `workspace`, `replica_id` and `pea_id` are
//! recognized. Anything else in a source document is ignored.
//!
//! # Environment naming
//!
//! Runtime arguments read from the environment use a prefix, a `__`
//! separator and uppercase key names. With prefix `EXECUTOR`:
//!
//! | variable | field |
//! |---|---|
//! | `EXECUTOR__NAME` | `name` |
//! | `EXECUTOR__WORKSPACE` | `workspace` |
//! | `EXECUTOR__REPLICA_ID` | `replica_id` |
//! | `EXECUTOR__PEA_ID` | `pea_id` |

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;

use crate::error::{ConfigError, Result};

/// Id value the orchestrator uses for "not deployed as a replica / shard"
pub const UNSET_ID: i64 = -1;

/// Default prefix for runtime arguments read from the environment
pub const DEFAULT_ENV_PREFIX: &str = "EXECUTOR";

const ENV_SEPARATOR: &str = "__";

/// Map the sentinel id to `None`
///
/// Only `-1` is the sentinel. `0` and every other value are real ids.
pub fn present_id(id: Option<i64>) -> Option<i64> {
    id.filter(|&id| id != UNSET_ID)
}

/// Treat empty strings the same as missing values
pub(crate) fn present_str(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Declared-at-definition options of a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metas {
    /// Identifies the component instance / shard group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit workspace root, takes precedence over the runtime one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Accepted for compatibility; replica placement is owned by runtime args
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica_id: Option<i64>,
    /// Accepted for compatibility; shard placement is owned by runtime args
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pea_id: Option<i64>,
}

impl Metas {
    /// Create metas with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the workspace
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Parse metas out of an arbitrary JSON mapping, ignoring unknown keys
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        from_mapping("metas", value)
    }
}

/// Options supplied by the orchestrator when it instantiates a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeArgs {
    /// Fallback name when metas do not declare one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Workspace root, used when metas do not set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Replica group index, `None` or `-1` when not replicated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica_id: Option<i64>,
    /// Shard index inside the replica, `None` or `-1` when not sharded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pea_id: Option<i64>,
}

impl RuntimeArgs {
    /// Create empty runtime arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Set the replica id
    pub fn with_replica_id(mut self, replica_id: i64) -> Self {
        self.replica_id = Some(replica_id);
        self
    }

    /// Set the pea id
    pub fn with_pea_id(mut self, pea_id: i64) -> Self {
        self.pea_id = Some(pea_id);
        self
    }

    /// Parse runtime args out of an arbitrary JSON mapping, ignoring unknown keys
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        from_mapping("runtime_args", value)
    }

    /// Read runtime arguments from the process environment
    ///
    /// Variables that are not valid UTF-8 are skipped unless they carry the
    /// prefix.
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_vars(prefix, std::env::vars_os())
    }

    /// Read runtime arguments from `(name, value)` pairs using the
    /// `<PREFIX>__<KEY>` convention
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        let prefix = format!("{}{}", prefix.to_uppercase(), ENV_SEPARATOR);
        let mut args = Self::default();

        for (key, value) in vars {
            let key = key.as_ref().to_string_lossy();
            let Some(field) = key.strip_prefix(&prefix) else {
                continue;
            };
            if !matches!(field, "NAME" | "WORKSPACE" | "REPLICA_ID" | "PEA_ID") {
                continue;
            }
            let value = value
                .as_ref()
                .to_str()
                .ok_or_else(|| ConfigError::invalid_value(&*key, "value is not valid UTF-8"))?;
            match field {
                "NAME" => args.name = Some(value.to_string()),
                "WORKSPACE" => args.workspace = Some(value.to_string()),
                "REPLICA_ID" => args.replica_id = Some(parse_id(&key, value)?),
                _ => args.pea_id = Some(parse_id(&key, value)?),
            }
        }

        Ok(args)
    }

    /// Layer `other` on top of `self`: every field set in `other` wins
    pub fn overlay(mut self, other: RuntimeArgs) -> Self {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.workspace.is_some() {
            self.workspace = other.workspace;
        }
        if other.replica_id.is_some() {
            self.replica_id = other.replica_id;
        }
        if other.pea_id.is_some() {
            self.pea_id = other.pea_id;
        }
        self
    }
}

fn from_mapping<T: for<'de> Deserialize<'de>>(source: &str, value: serde_json::Value) -> Result<T> {
    match value {
        serde_json::Value::Null => serde_json::from_value(serde_json::Value::Object(
            serde_json::Map::new(),
        ))
        .map_err(ConfigError::from),
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| ConfigError::invalid_value(source, e.to_string())),
        other => Err(ConfigError::invalid_value(
            source,
            format!("expected a mapping, found {}", other),
        )),
    }
}

fn parse_id(key: &str, value: &str) -> Result<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(UNSET_ID);
    }
    trimmed
        .parse::<i64>()
        .map_err(|e| ConfigError::invalid_value(key, format!("'{}' is not an integer: {}", value, e)))
}
